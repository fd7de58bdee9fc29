//! Laws of the separator, the classifier and the document walker

use pretty_assertions::assert_eq;
use texnote::core::blocks::extract_environment;
use texnote::core::separator::{ArgSlot, Bracket};
use texnote::core::walker::{Marked, PassThrough};
use texnote::core::{
    classify, separate, ArgumentPolicy, DocumentWalker, PolicyTable, Separator, SpanMarker,
    WalkOptions, DEFAULT_POLICY_TABLE,
};

const SAMPLES: &[&str] = &[
    "",
    "Texto plano sin comandos.",
    r"Ver \cite[p. 3]{knuth} y \ref{fig:uno}.",
    r"\textbf{Negrita con \emph{énfasis} dentro} y fuera.",
    r"\comment{texto}{nota} seguido de $x_{i}^{2}$ y \(y\).",
    r"\textcolor[rgb]{1,0,0}{rojo} \hl{resaltado}",
    r"Un 50\% de \{casos\} con \\[2pt] salto.",
    r"{Grupo anónimo} y \foo{a}{b}{c} con {llaves {anidadas}}.",
    r"\footnote{Nota sin cerrar",
    r"llave suelta } en medio",
    r"\begin{itemize}\item Uno \item Dos\end{itemize}",
    "Acentos: canción, pingüino, año.",
];

// ============================================================================
// Separator
// ============================================================================

#[test]
fn test_merge_without_edits_is_identity() {
    for sample in SAMPLES {
        let partition = separate(sample);
        assert_eq!(partition.merge(), *sample);
        assert!(partition.covers(sample.len()), "gaps in {:?}", sample);
    }
}

#[test]
fn test_ignore_spans_survive_prose_edits() {
    for sample in SAMPLES {
        let mut partition = separate(sample);
        let ignored: Vec<String> = partition.ignore.iter().map(|s| s.content.clone()).collect();
        for span in partition.analyze.iter_mut() {
            span.content = span.content.to_uppercase();
        }
        let merged = partition.merge();
        let mut from = 0;
        for piece in &ignored {
            let at = merged[from..]
                .find(piece.as_str())
                .unwrap_or_else(|| panic!("{:?} lost from {:?}", piece, merged));
            from += at + piece.len();
        }
    }
}

#[test]
fn test_unlisted_command_arguments_are_never_prose() {
    let partition = separate(r"Antes \nuevo[opción]{argumento}{otro} después");
    for span in &partition.analyze {
        assert!(!span.content.contains("argumento"));
        assert!(!span.content.contains("otro"));
        assert!(!span.content.contains("opción"));
    }
}

#[test]
fn test_nesting_depth_follows_groups() {
    let partition = separate(r"\textbf{uno \emph{dos \textit{tres}}}");
    let depths: Vec<(&str, usize)> = partition
        .analyze
        .iter()
        .map(|s| (s.content.trim(), s.depth))
        .collect();
    assert_eq!(depths, vec![("uno", 1), ("dos", 2), ("tres", 3)]);
}

#[test]
fn test_registered_policy_is_honored() {
    let mut table = PolicyTable::builtin();
    table.register(
        "glosa",
        ArgumentPolicy::new(vec![ArgSlot::ignore(Bracket::Brace), ArgSlot::analyze()]),
    );
    let partition = Separator::new(&table).separate(r"\glosa{clave}{explicación}");
    let analyzed: Vec<&str> = partition.analyze.iter().map(|s| s.content.as_str()).collect();
    assert_eq!(analyzed, vec!["explicación"]);
    let builtin = separate(r"\glosa{clave}{explicación}");
    assert!(builtin.analyze.is_empty());
}

// ============================================================================
// Classifier and blocks
// ============================================================================

#[test]
fn test_classifier_is_total() {
    for sample in SAMPLES {
        for line in sample.split('\n') {
            assert_eq!(classify(line).is_none(), line.trim().is_empty(), "{:?}", line);
        }
    }
    assert!(classify("   \t").is_none());
}

#[test]
fn test_nested_environment_is_balanced() {
    let lines = [
        r"\begin{figure}",
        r"\begin{figure}",
        r"\end{figure}",
        r"\caption{Dentro}",
        r"\end{figure}",
        "Después.",
    ];
    let block = extract_environment(&lines, 0);
    assert!(block.balanced);
    assert_eq!(block.end, 4);
    assert_eq!(block.text, lines[..5].join("\n"));
}

#[test]
fn test_unbalanced_environment_runs_to_end() {
    let lines = [r"\begin{table}", "fila", r"\begin{table}", r"\end{table}"];
    let block = extract_environment(&lines, 0);
    assert!(!block.balanced);
    assert_eq!(block.end, 3);
}

// ============================================================================
// Walker
// ============================================================================

fn quiet() -> WalkOptions {
    WalkOptions {
        comments_per_page: 0,
        chapter_intro_check: false,
    }
}

#[test]
fn test_pass_through_walk_is_identity() {
    let lines = [
        r"\chapter{Uno}",
        r"Primer párrafo con \cite{x}.",
        "",
        r"\begin{equation}",
        "a = b",
        r"\end{equation}",
        "% comentario",
        r"\section{Dos}",
        r"Texto con $x$ y \emph{énfasis}.",
    ];
    let options = quiet();
    let mut marker = PassThrough;
    let output = DocumentWalker::new(&DEFAULT_POLICY_TABLE, &mut marker, &options).walk(&lines);
    assert_eq!(output.text, lines.join("\n"));
    assert_eq!(output.units.len(), 4);
    assert!(output.warnings.is_empty());
}

struct Noisy;

impl SpanMarker for Noisy {
    fn mark(&mut self, content: &str) -> Marked {
        Marked::new(content.to_uppercase(), 1)
    }
}

#[test]
fn test_line_map_is_monotonic_over_a_walk() {
    let lines = [
        r"\section{Inicio}",
        r"\section{Primera}",
        "Una línea",
        "que sigue.",
        r"\[ x \]",
        r"\begin{itemize}",
        r"\item Uno",
        r"\end{itemize}",
        r"\chapter{Otro}",
        "Último párrafo.",
    ];
    let options = WalkOptions {
        comments_per_page: 2,
        chapter_intro_check: true,
    };
    let mut marker = Noisy;
    let output = DocumentWalker::new(&DEFAULT_POLICY_TABLE, &mut marker, &options).walk(&lines);
    assert!(output.line_map.is_monotonic());

    let out_lines: Vec<&str> = output.text.split('\n').collect();
    for unit in &output.units {
        let line = output.line_map.resolve(unit.compact_index).unwrap();
        assert!(line < out_lines.len());
    }
    let second = output.line_map.resolve(1).unwrap();
    assert_eq!(out_lines[second], r"\section{Primera}");
}
