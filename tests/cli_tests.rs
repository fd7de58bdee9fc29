use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

const DOCUMENT: &str = "\\documentclass{book}\n\\begin{document}\n\\chapter{Inicio}\nEl método converge. Funciona bien.\n\\section{Datos}\nTú escribes el texto.\n\\end{document}\n";

fn temp_dir(name: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let unique = format!("texnote-{}-{}", name, std::process::id());
    dir.push(unique);
    let _ = fs::remove_dir_all(&dir);
    let _ = fs::create_dir_all(&dir);
    dir
}

fn write_file(path: &Path, content: &str) {
    let mut file = fs::File::create(path).expect("create file");
    file.write_all(content.as_bytes()).expect("write file");
}

fn texnote() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_texnote"));
    cmd.env_remove("TEXNOTE_LLM_CMD")
        .env_remove("TEXNOTE_ANALYZER_CMD")
        .env_remove("TEXNOTE_LOG");
    cmd
}

fn run_with_stdin(mut cmd: Command, input: &str) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("run texnote");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait texnote")
}

#[test]
fn stdin_is_annotated_to_stdout() {
    let mut cmd = texnote();
    cmd.arg("--no-review");
    let output = run_with_stdin(cmd, DOCUMENT);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(r"\comment{Tú}{Escribir en 3ra persona}"));
    assert!(stdout.contains("\\input{word-comments.tex}\n\\begin{document}"));
    assert!(stdout.contains(r"\section{Datos}"));
}

#[test]
fn file_input_gets_dated_output_next_to_it() {
    let dir = temp_dir("default-output");
    let input_path = dir.join("tesis.tex");
    write_file(&input_path, DOCUMENT);

    for _ in 0..2 {
        let output = texnote()
            .arg(&input_path)
            .arg("--no-review")
            .output()
            .expect("run texnote");
        assert!(output.status.success());
    }

    let mut written: Vec<String> = fs::read_dir(&dir)
        .expect("read dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("tesis-revisado-"))
        .collect();
    written.sort();
    assert_eq!(written.len(), 2);
    assert!(written.iter().all(|name| name.ends_with(".tex")));
    assert!(written.iter().any(|name| name.ends_with("v1.tex")));

    let annotated = fs::read_to_string(dir.join(&written[0])).expect("read output");
    assert!(annotated.contains(r"\comment{Tú}{Escribir en 3ra persona}"));
}

#[test]
fn report_is_written_as_json() {
    let dir = temp_dir("report");
    let input_path = dir.join("input.tex");
    let output_path = dir.join("output.tex");
    let report_path = dir.join("report.json");
    write_file(&input_path, DOCUMENT);

    let output = texnote()
        .arg(&input_path)
        .arg("-o")
        .arg(&output_path)
        .arg("--report")
        .arg(&report_path)
        .arg("--no-review")
        .output()
        .expect("run texnote");
    assert!(output.status.success());
    assert!(output_path.exists());

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).expect("read report"))
            .expect("parse report");
    assert_eq!(report["marks"]["person"], 1);
    assert_eq!(report["units"], 4);
    assert!(report["line_map"].as_array().map_or(false, |a| a.len() == 4));
}

#[test]
fn model_command_notes_are_inserted() {
    let dir = temp_dir("model");
    let input_path = dir.join("input.tex");
    let output_path = dir.join("output.tex");
    let script_path = dir.join("model.sh");
    write_file(&input_path, DOCUMENT);
    write_file(
        &script_path,
        r####"input=$(cat)
case "$input" in
  *"### Ideas:"*)
    printf 'Idea: Funciona bien.\nAmbigua/No ambigua: Sí\nPor qué: ¿comparado con qué?\n' ;;
  *"Idea: [oración exacta del texto]"*)
    printf 'Idea: Funciona bien.\n' ;;
  *"Orden lógico"*)
    printf 'Orden lógico: No\nSugerencias de mejora para el orden: Mueve Datos antes.\n' ;;
  *)
    printf 'NO\n' ;;
esac
"####,
    );

    let output = texnote()
        .arg(&input_path)
        .arg("-o")
        .arg(&output_path)
        .arg("--llm-cmd")
        .arg(format!("sh {}", script_path.display()))
        .output()
        .expect("run texnote");
    assert!(output.status.success());

    let annotated = fs::read_to_string(&output_path).expect("read output");
    assert!(annotated
        .contains(r"El método converge. \comment{Ambigüedad}{¿comparado con qué?} Funciona bien."));
    assert!(annotated.contains("\\chapter{Inicio}\n\\notaparaelautor{Mueve Datos antes.}"));
}

#[test]
fn failing_model_command_only_warns() {
    let dir = temp_dir("failing-model");
    let input_path = dir.join("input.tex");
    write_file(&input_path, DOCUMENT);

    let output = texnote()
        .arg(&input_path)
        .arg("-o")
        .arg(dir.join("output.tex"))
        .arg("--llm-cmd")
        .arg("exit 3")
        .arg("--no-color")
        .output()
        .expect("run texnote");
    assert!(output.status.success());
    assert!(!output.stderr.is_empty());
}

#[test]
fn missing_document_environment_fails() {
    let output = run_with_stdin(texnote(), "\\section{Sin documento}\n");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn invalid_config_exits_with_code_two() {
    let dir = temp_dir("bad-config");
    let config_path = dir.join("texnote.toml");
    write_file(&config_path, "words = 3\n");

    let mut cmd = texnote();
    cmd.arg("--config").arg(&config_path);
    let output = run_with_stdin(cmd, DOCUMENT);
    assert_eq!(output.status.code(), Some(2));
}
