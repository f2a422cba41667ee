// Report rendering.
// Writes matched repositories as a plain, line-oriented listing with optional color.

use std::borrow::Cow;
use std::io::{self, Write};

use console::Style;

use crate::finder::{Origin, SearchOutcome};
use crate::matcher::{Query, fold_case};
use crate::star::StarRecord;

struct Styles {
    enabled: bool,
    name: Style,
    url: Style,
    hit: Style,
}

impl Styles {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            name: Style::new().green().bold().force_styling(enabled),
            url: Style::new().blue().force_styling(enabled),
            hit: Style::new().red().force_styling(enabled),
        }
    }
}

/// Write every match in `outcome`.
///
/// Each record is a header line `owner/repo (url)` followed by `- ` lines for
/// the description, language, and topics that are present, then a blank line.
pub fn render<W: Write>(
    out: &mut W,
    outcome: &SearchOutcome,
    query: &Query,
    use_color: bool,
) -> io::Result<()> {
    let styles = Styles::new(use_color);
    for record in &outcome.matches {
        render_record(out, record, query, &styles)?;
    }
    out.flush()
}

fn render_record<W: Write>(
    out: &mut W,
    record: &StarRecord,
    query: &Query,
    styles: &Styles,
) -> io::Result<()> {
    writeln!(
        out,
        "{} ({})",
        styles.name.apply_to(&record.full_name),
        styles.url.apply_to(&record.html_url)
    )?;

    if !record.description.is_empty() {
        let description = record.description.trim();
        writeln!(out, "- {}", highlight(description, query, styles))?;
    }
    if !record.language.is_empty() {
        writeln!(
            out,
            "- language: {}",
            highlight(&record.language, query, styles)
        )?;
    }
    if !record.topics.is_empty() {
        writeln!(
            out,
            "- topics: {}",
            highlight(&record.topics.join(", "), query, styles)
        )?;
    }
    writeln!(out)
}

/// One-line count of matches and where they came from, for stderr.
pub fn summary(outcome: &SearchOutcome) -> String {
    let noun = if outcome.total == 1 {
        "repository"
    } else {
        "repositories"
    };
    let source = match outcome.origin {
        Origin::Cache => "cached",
        Origin::Fetched => "fetched",
    };
    format!(
        "{} of {} starred {} matched for {} ({} {})",
        outcome.matches.len(),
        outcome.total,
        noun,
        outcome.username,
        source,
        outcome.fetched_at.format("%Y-%m-%d %H:%M UTC")
    )
}

/// Color keyword occurrences in `text`.
///
/// Text whose case folding changes its byte length is left unstyled.
fn highlight<'a>(text: &'a str, query: &Query, styles: &Styles) -> Cow<'a, str> {
    if !styles.enabled || query.is_empty() {
        return Cow::Borrowed(text);
    }

    let haystack = if query.case_sensitive() {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(fold_case(text))
    };
    if haystack.len() != text.len() {
        return Cow::Borrowed(text);
    }

    let mut marked = vec![false; text.len()];
    for keyword in query.keywords().iter().filter(|k| !k.is_empty()) {
        for (start, found) in haystack.match_indices(keyword.as_str()) {
            marked[start..start + found.len()].fill(true);
        }
    }
    if !marked.contains(&true) {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len() * 2);
    let mut run_start = 0;
    let mut run_marked = marked[0];
    for (index, _) in text.char_indices().skip(1) {
        if marked[index] != run_marked {
            push_run(&mut result, &text[run_start..index], run_marked, styles);
            run_start = index;
            run_marked = marked[index];
        }
    }
    push_run(&mut result, &text[run_start..], run_marked, styles);

    Cow::Owned(result)
}

fn push_run(result: &mut String, run: &str, marked: bool, styles: &Styles) {
    if marked {
        result.push_str(&styles.hit.apply_to(run).to_string());
    } else {
        result.push_str(run);
    }
}
