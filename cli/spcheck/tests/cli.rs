//! Exit-code contract of the `spcheck` binary.

use std::process::{Command, Output};

fn spcheck(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_spcheck"))
        .args(args)
        .output()
        .expect("spawn spcheck")
}

#[test]
fn help_exits_zero() {
    let output = spcheck(&["--help"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("EXEC_ARGS"));
}

#[test]
fn too_few_execution_arguments_exit_one() {
    let output = spcheck(&["bin/llc", "prog.ll", "", "prog.o", "start.o", "1=0"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!output.stderr.is_empty());
}

#[test]
fn missing_tool_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("llc");
    let output = spcheck(&[
        marker.to_str().unwrap(),
        "prog.ll",
        "",
        "prog.o",
        "start.o",
        "1=0",
        "2=0",
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("error: required tool 'llc'"));
}

#[cfg(unix)]
mod scripted {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use std::sync::Mutex;

    use super::spcheck;

    // Writing a script while another test thread forks can leave it busy for exec.
    static SERIAL: Mutex<()> = Mutex::new(());

    const COPY_TOOL: &str = r#"#!/bin/sh
out=""; prev=""
for a in "$@"; do
  if [ "$prev" = "-o" ]; then out="$a"; fi
  prev="$a"
done
cat "$1" > "$out.tmp" && mv "$out.tmp" "$out"
"#;

    const LINKER: &str = r#"#!/bin/sh
{ cat "$5"; echo "$7"; } > "$4"
"#;

    const SIMULATOR: &str = r#"#!/bin/sh
n=$(sed -n 's/^input=//p' "$1")
cat >&2 <<EOF
Instruction Statistics:
   operation     #fetched   #retired  #discard   #fetched   #retired  #discard
         add:          10         10         0          5          5         0
         all:          10         10         0          5          5         0
      Cycles:      $((100 + n))
Profiling information:

    func            cycles
                    count     min     max
EOF
exit $((n % 2))
"#;

    fn write_tool(dir: &Path, name: &str, body: &str) {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// Lay out fake tools plus a config restricted to `matrix`; returns the
    /// config path.
    fn setup(dir: &Path, matrix: &str) -> String {
        let bin = dir.join("bin");
        fs::create_dir(&bin).unwrap();
        write_tool(&bin, "llc", COPY_TOOL);
        write_tool(&bin, "llvm-link", COPY_TOOL);
        write_tool(&bin, "ld.lld", LINKER);
        write_tool(&bin, "pasim", SIMULATOR);
        fs::write(dir.join("prog.ll"), "define i32 @main()\n").unwrap();
        fs::write(dir.join("start.ll"), "define void @_start()\n").unwrap();

        let config = dir.join("spcheck.toml");
        fs::write(
            &config,
            format!(
                "matrix = {matrix}\n\n[tools]\nlinker = \"{}\"\nsimulator = \"{}\"\n",
                bin.join("ld.lld").display(),
                bin.join("pasim").display()
            ),
        )
        .unwrap();
        config.display().to_string()
    }

    fn args(dir: &Path, config: &str, extra: &[&str]) -> Vec<String> {
        let mut args = vec![
            "--config".to_string(),
            config.to_string(),
            dir.join("bin/llc").display().to_string(),
            dir.join("prog.ll").display().to_string(),
            String::new(),
            dir.join("prog.o").display().to_string(),
            dir.join("start.ll").display().to_string(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        args
    }

    #[test]
    fn traditional_matrix_passes_with_json_report() {
        let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let config = setup(dir.path(), r#"[["", "-O1"]]"#);
        let mut argv = args(dir.path(), &config, &["2=0", "4=0"]);
        argv.insert(0, "json".into());
        argv.insert(0, "--report".into());
        let argv: Vec<&str> = argv.iter().map(String::as_str).collect();

        let output = spcheck(&argv);
        assert!(
            output.status.success(),
            "stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains(r#""flags": "-O1""#));
        assert!(stdout.contains(r#""kind": "cycles""#));
    }

    #[test]
    fn single_path_divergence_exits_one() {
        let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let config = setup(dir.path(), r#"[["-mpatmos-singlepath=main"]]"#);
        let argv = args(dir.path(), &config, &["2=0", "4=0"]);
        let argv: Vec<&str> = argv.iter().map(String::as_str).collect();

        let output = spcheck(&argv);
        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("weren't equivalent"));
        assert!(stderr.contains("+Cycles: 104"));
        assert!(stderr.contains("compiler flags: [-mpatmos-singlepath=main]"));
    }

    #[test]
    fn wrong_exit_code_exits_one() {
        let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let config = setup(dir.path(), r#"[[""]]"#);
        let argv = args(dir.path(), &config, &["2=0", "5=0"]);
        let argv: Vec<&str> = argv.iter().map(String::as_str).collect();

        let output = spcheck(&argv);
        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("for input argument '5' gave the wrong exit code"));
    }
}
