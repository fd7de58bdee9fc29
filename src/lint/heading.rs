//! Chapter and section declaration checks

use lazy_static::lazy_static;
use regex::Regex;

use crate::core::classify::heading_title;
use crate::lint::weasel;
use crate::lint::wordlists::CompiledWordLists;

pub const HAND_NUMBERED_NOTE: &str =
    "No pongas el número de la sección tú a mano. Deja que LaTeX se encargue de eso.";
pub const TITLE_WORDS_NOTE: &str = "En el nombre del capítulo o sección pusiste: ";

lazy_static! {
    static ref NUMBERED_HEADING_RE: Regex = Regex::new(
        r"^(\s*\\(?:chapter|part|(?:sub)*section)\*?\s*(?:\[[^\]]*\])?\s*\{)(\s*)(\d+(?:\.\d+)*\.?)"
    )
    .unwrap();
}

/// Highlight a hand-written number at the start of a heading title.
/// Returns `None` when the title is not numbered.
pub fn highlight_number(line: &str) -> Option<String> {
    let caps = NUMBERED_HEADING_RE.captures(line)?;
    let whole = caps.get(0)?;
    Some(format!(
        "{}{}\\textcolor{{orange}}{{{}}}{}",
        &caps[1],
        &caps[2],
        &caps[3],
        &line[whole.end()..]
    ))
}

/// Note listing weasel words and anglicisms used in the title
pub fn title_words_note(line: &str, lists: &CompiledWordLists) -> Option<String> {
    let title = heading_title(line)?;
    let found = weasel::describe(title, lists);
    if found.is_empty() {
        return None;
    }
    Some(format!("{}{}", TITLE_WORDS_NOTE, found.join(", ")))
}
