//! CLI command implementations

use anyhow::{Context, Result};
use chordconf::{ChordConfig, OutputFormat};
use chordscope::{
    candidate_statuses, degree_label, decompose, format_confidence, parse_selection,
    pitch_class_profile, scan_progression, AnalysisResult, AnalysisSession, ChordReport,
    ConfidenceTier, Feedback, Key, RelationshipKind,
};
use serde_json::json;
use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::palette::Palette;

/// Where `analyze` reads the analysis result from.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultSource {
    Stdin,
    File(PathBuf),
}

impl ResultSource {
    /// `-` means stdin.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            ResultSource::Stdin
        } else {
            ResultSource::File(PathBuf::from(arg))
        }
    }

    fn load(&self) -> Result<AnalysisResult> {
        match self {
            ResultSource::Stdin => AnalysisResult::from_reader(std::io::stdin().lock())
                .context("Failed to read analysis result from stdin"),
            ResultSource::File(path) => AnalysisResult::from_path(path)
                .with_context(|| format!("Failed to load analysis result {}", path.display())),
        }
    }
}

pub struct AnalyzeOptions {
    pub progression: String,
    pub source: ResultSource,
    /// Raw `CHORD=KEY` arguments, applied in order.
    pub selections: Vec<String>,
    pub format: OutputFormat,
    pub show_rejected: bool,
    pub profile: bool,
}

/// Print the accepted chord symbols, one per line
pub fn chords(
    out: &mut impl Write,
    progression: &str,
    show_rejected: bool,
    palette: &Palette,
) -> Result<()> {
    let scanned = scan_progression(progression);
    for token in &scanned.value.tokens {
        writeln!(out, "{}", palette.symbol(&token.symbol))?;
    }
    if show_rejected {
        write_rejected(out, &scanned.feedback, palette)?;
    }
    Ok(())
}

/// Print `symbol<TAB>degree` for each chord
pub fn degrees(out: &mut impl Write, progression: &str, key: &str, palette: &Palette) -> Result<()> {
    let key: Key = key.parse()?;
    debug!(%key, "labelling progression");

    for token in scan_progression(progression).value.tokens {
        let chord = decompose(&token.symbol);
        writeln!(
            out,
            "{}\t{}",
            palette.symbol(&token.symbol),
            palette.degree(&degree_label(&chord, &key))
        )?;
    }
    Ok(())
}

/// Report a progression against a service analysis result
pub fn analyze(out: &mut impl Write, options: AnalyzeOptions, palette: &Palette) -> Result<()> {
    let result = options.source.load()?;
    let mut session = AnalysisSession::new(options.progression, result);

    for arg in &options.selections {
        let (chord, key) = parse_selection(arg)?;
        if session.result().borrowed_info(&chord).is_none() {
            warn!(%chord, "selection has no effect: not a borrowed chord");
        }
        session.select(chord, key);
    }

    match options.format {
        OutputFormat::Json => write_json(out, &session, options.profile),
        OutputFormat::Text => write_text(out, &session, options.show_rejected, options.profile, palette),
    }
}

/// Print the effective configuration
pub fn config(out: &mut impl Write, config: &ChordConfig) -> Result<()> {
    write!(out, "{}", config.to_toml())?;
    Ok(())
}

fn write_json(out: &mut impl Write, session: &AnalysisSession, profile: bool) -> Result<()> {
    let result = session.result();
    let report = session.report();

    let profile = profile.then(|| {
        pitch_class_profile(result)
            .into_iter()
            .map(|(name, weight)| json!({ "pitch_class": name, "weight": weight }))
            .collect::<Vec<_>>()
    });

    let value = json!({
        "main_key": result.main_key,
        "confidence": result.confidence,
        "algorithm": result.algorithm_used,
        "chords": report.value,
        "selections": session.selections(),
        "rejected": report.feedback,
        "profile": profile,
    });

    writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
    Ok(())
}

fn write_text(
    out: &mut impl Write,
    session: &AnalysisSession,
    show_rejected: bool,
    profile: bool,
    palette: &Palette,
) -> Result<()> {
    let result = session.result();
    let report = session.report();

    let tier = ConfidenceTier::from_confidence(result.confidence);
    writeln!(
        out,
        "Key: {}  {}",
        palette.symbol(&result.main_key),
        palette.confidence(&format!("{} ({})", format_confidence(result.confidence), tier), tier)
    )?;
    if let Some(algorithm) = &result.algorithm_used {
        writeln!(out, "Algorithm: {}", algorithm)?;
    }
    for estimate in &result.key_candidates {
        writeln!(
            out,
            "  {}  {}  {}  ({} borrowed)",
            estimate.key,
            format_confidence(estimate.confidence),
            estimate.algorithm,
            estimate.borrowed_chord_count
        )?;
    }
    writeln!(out)?;

    let symbol_width = report.value.iter().map(|c| c.symbol.chars().count()).max().unwrap_or(0);
    let degree_width = report.value.iter().map(|c| c.degree.chars().count()).max().unwrap_or(0);

    let mut listed = HashSet::new();
    for chord in &report.value {
        write_chord_line(out, chord, symbol_width, degree_width, palette)?;
        if chord.annotation.is_borrowed && listed.insert(chord.symbol.as_str()) {
            write_candidates(out, session, &chord.symbol, symbol_width + degree_width + 4, palette)?;
        }
    }

    if show_rejected && !report.feedback.is_empty() {
        writeln!(out)?;
        write_rejected(out, &report.feedback, palette)?;
    }

    if profile {
        writeln!(out)?;
        writeln!(out, "Pitch classes:")?;
        for (name, weight) in pitch_class_profile(result) {
            let bar = "#".repeat((weight.clamp(0.0, 1.0) * 40.0).round() as usize);
            writeln!(out, "  {:<2} {:.2} {}", name, weight, palette.dim(&bar))?;
        }
    }

    Ok(())
}

fn write_chord_line(
    out: &mut impl Write,
    chord: &ChordReport,
    symbol_width: usize,
    degree_width: usize,
    palette: &Palette,
) -> Result<()> {
    let symbol = palette.symbol(&format!("{:<width$}", chord.symbol, width = symbol_width));
    let degree = palette.degree(&format!("{:<width$}", chord.degree, width = degree_width));

    if !chord.annotation.is_borrowed {
        writeln!(out, "{}  {}", symbol, degree.trim_end())?;
        return Ok(());
    }

    let source = chord
        .annotation
        .displayed_source_key
        .as_deref()
        .unwrap_or("unknown key");
    let mut line = format!("borrowed from {}", source);
    if !chord.annotation.non_diatonic_notes.is_empty() {
        line.push_str(&format!(" [{}]", chord.annotation.non_diatonic_notes.join(", ")));
    }
    writeln!(out, "{}  {}  {}", symbol, degree, palette.borrowed(&line))?;
    Ok(())
}

fn write_candidates(
    out: &mut impl Write,
    session: &AnalysisSession,
    chord: &str,
    indent: usize,
    palette: &Palette,
) -> Result<()> {
    let Some(info) = session.result().borrowed_info(chord) else {
        return Ok(());
    };

    for (candidate, status) in candidate_statuses(info, session.selections()) {
        let marker = match status {
            chordscope::CandidateStatus::Selected => "selected",
            chordscope::CandidateStatus::AutoSelected => "auto",
            chordscope::CandidateStatus::Unselected => "",
        };
        let kind = RelationshipKind::classify(&candidate.relationship);
        let line = format!(
            "{:indent$}{}  {}  {}",
            "",
            palette.candidate(&candidate.key, status),
            palette.relationship(&candidate.relationship, kind),
            format_confidence(candidate.confidence),
            indent = indent
        );
        if marker.is_empty() {
            writeln!(out, "{}", line)?;
        } else {
            writeln!(out, "{}  [{}]", line, marker)?;
        }
    }
    Ok(())
}

fn write_rejected(out: &mut impl Write, feedback: &[Feedback], palette: &Palette) -> Result<()> {
    for item in feedback {
        let mut line = format!("# skipped {}:{}: {}", item.line, item.column, item.message);
        if let Some(suggestion) = &item.suggestion {
            line.push_str(&format!(" (did you mean '{}'?)", suggestion));
        }
        writeln!(out, "{}", palette.dim(&line))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULT: &str = r#"{
        "main_key": "C Major",
        "confidence": 0.87,
        "borrowed_chords": [
            {
                "chord": "Fm",
                "non_diatonic_notes": ["G#"],
                "source_candidates": [
                    {"key": "C Minor", "relationship": "Parallel Minor", "confidence": 0.9},
                    {"key": "F Minor", "relationship": "Subdominant Minor", "confidence": 0.7}
                ]
            }
        ],
        "pitch_class_vector": [0.3, 0.0, 0.1, 0.0, 0.1, 0.2, 0.0, 0.2, 0.1, 0.0, 0.0, 0.0]
    }"#;

    fn result_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(RESULT.as_bytes()).unwrap();
        file
    }

    fn options(file: &tempfile::NamedTempFile, format: OutputFormat) -> AnalyzeOptions {
        AnalyzeOptions {
            progression: "[C][Fm][ ][G7][Fm]".to_string(),
            source: ResultSource::File(file.path().to_path_buf()),
            selections: Vec::new(),
            format,
            show_rejected: false,
            profile: false,
        }
    }

    fn run(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_result_source_from_arg() {
        assert_eq!(ResultSource::from_arg("-"), ResultSource::Stdin);
        assert_eq!(
            ResultSource::from_arg("out.json"),
            ResultSource::File(PathBuf::from("out.json"))
        );
    }

    #[test]
    fn test_chords_lists_symbols() {
        let output = run(|out| chords(out, "[C][Am][|][F]", false, &Palette::plain()));
        assert_eq!(output, "C\nAm\nF\n");
    }

    #[test]
    fn test_chords_shows_rejected() {
        let output = run(|out| chords(out, "[C][am]", true, &Palette::plain()));
        assert_eq!(
            output,
            "C\n# skipped 1:4: 'am' has a lowercase root (did you mean 'Am'?)\n"
        );
    }

    #[test]
    fn test_degrees_tab_separated() {
        let output = run(|out| degrees(out, "[Am][Dm][E7]", "A Minor", &Palette::plain()));
        assert_eq!(output, "Am\ti\nDm\tiv\nE7\tV7\n");
    }

    #[test]
    fn test_degrees_rejects_bad_key() {
        let mut out = Vec::new();
        let err = degrees(&mut out, "[C]", "C major", &Palette::plain()).unwrap_err();
        assert!(err.to_string().contains("C major"));
    }

    #[test]
    fn test_analyze_text() {
        let file = result_file();
        let output = run(|out| analyze(out, options(&file, OutputFormat::Text), &Palette::plain()));

        assert!(output.starts_with("Key: C Major  87.0% (high)\n"));
        assert!(output.contains("Fm  iv  borrowed from C Minor [G#]"));
        assert!(output.contains("G7  V7\n"));
        // candidates listed once, under the first Fm
        assert_eq!(output.matches("Parallel Minor").count(), 1);
        assert!(output.contains("[auto]"));
    }

    #[test]
    fn test_analyze_selection_changes_source() {
        let file = result_file();
        let mut opts = options(&file, OutputFormat::Text);
        opts.selections = vec!["Fm=F Minor".to_string()];

        let output = run(|out| analyze(out, opts, &Palette::plain()));
        assert!(output.contains("borrowed from F Minor"));
        assert!(output.contains("[selected]"));
        assert!(!output.contains("[auto]"));
    }

    #[test]
    fn test_analyze_bad_selection() {
        let file = result_file();
        let mut opts = options(&file, OutputFormat::Text);
        opts.selections = vec!["Fm".to_string()];

        let mut out = Vec::new();
        assert!(analyze(&mut out, opts, &Palette::plain()).is_err());
    }

    #[test]
    fn test_analyze_json() {
        let file = result_file();
        let mut opts = options(&file, OutputFormat::Json);
        opts.profile = true;

        let output = run(|out| analyze(out, opts, &Palette::plain()));
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["main_key"], "C Major");
        assert_eq!(value["chords"].as_array().unwrap().len(), 4);
        assert_eq!(value["chords"][1]["degree"], "iv");
        assert_eq!(
            value["chords"][1]["annotation"]["displayed_source_key"],
            "C Minor"
        );
        assert_eq!(value["rejected"].as_array().unwrap().len(), 1);
        assert_eq!(value["profile"].as_array().unwrap().len(), 12);
        assert_eq!(value["profile"][0]["pitch_class"], "C");
    }

    #[test]
    fn test_analyze_missing_file() {
        let opts = AnalyzeOptions {
            progression: "[C]".to_string(),
            source: ResultSource::File(PathBuf::from("/nonexistent/result.json")),
            selections: Vec::new(),
            format: OutputFormat::Text,
            show_rejected: false,
            profile: false,
        };
        let mut out = Vec::new();
        let err = analyze(&mut out, opts, &Palette::plain()).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/result.json"));
    }

    #[test]
    fn test_config_prints_toml() {
        let output = run(|out| config(out, &ChordConfig::default()));
        assert!(output.contains("[output]"));
        assert!(output.contains("log_level = \"warn\""));
    }
}
