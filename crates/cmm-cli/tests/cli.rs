//! End-to-end tests that invoke the built `cmmc` binary directly, per
//! spec.md §8's scenarios and the exit-code contract.

use std::process::Command;

fn cmmc() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cmmc"))
}

#[test]
fn hello_world_compiles_and_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("hello.cmm");
    std::fs::write(&input, "int main() {\n  cout << \"hi\";\n  return 0;\n}\n").unwrap();
    let output = dir.path().join("hello.s");

    let status = cmmc()
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .status()
        .expect("cmmc should run");

    assert!(status.success());
    let asm = std::fs::read_to_string(&output).unwrap();
    assert!(asm.contains("main:\n_start:\n"));
    assert!(asm.contains(".asciiz \"hi\""));
}

#[test]
fn defaults_the_output_path_to_the_input_stem() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("prog.cmm");
    std::fs::write(&input, "int main() { return 0; }\n").unwrap();

    let status = cmmc().arg(&input).status().expect("cmmc should run");

    assert!(status.success());
    assert!(dir.path().join("prog.s").exists());
}

#[test]
fn type_error_exits_one_and_leaves_a_previous_output_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.cmm");
    let output = dir.path().join("bad.s");
    std::fs::write(&output, "; previous run's assembly\n").unwrap();
    std::fs::write(
        &input,
        "void f() {}\nint main() { int x; x = f(); return 0; }\n",
    )
    .unwrap();

    let result = cmmc().arg(&input).arg("-o").arg(&output).output().unwrap();

    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Type mismatch"));
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "; previous run's assembly\n"
    );
}

#[test]
fn parse_error_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("unparseable.cmm");
    std::fs::write(&input, "int main( { return 0; }\n").unwrap();

    let result = cmmc().arg(&input).output().unwrap();

    assert_eq!(result.status.code(), Some(2));
}

#[test]
fn missing_input_file_exits_three() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.cmm");

    let result = cmmc().arg(&missing).output().unwrap();

    assert_eq!(result.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.starts_with("error: cannot read"));
}

#[test]
fn emit_diagnostics_only_writes_no_assembly() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("prog.cmm");
    std::fs::write(&input, "int main() { return 0; }\n").unwrap();

    let status = cmmc()
        .arg(&input)
        .arg("--emit-diagnostics-only")
        .status()
        .expect("cmmc should run");

    assert!(status.success());
    assert!(!dir.path().join("prog.s").exists());
}
