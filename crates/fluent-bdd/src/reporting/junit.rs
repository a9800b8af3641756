//! JUnit XML writer.
//!
//! One `<testsuite>` is produced per call. Every step of every group becomes a
//! `<testcase>` named `"<group label> :: <Keyword> <message>"` whose classname
//! is the scenario name, so CI dashboards show each replayed assertion on its
//! own. Failed steps carry a `<failure>`; skipped steps a `<skipped>`. Release
//! failures are attached to a synthetic `<group label> :: disposal` case.
//! Steps that never ran because an earlier step failed are omitted.
//! A scenario without groups is written as a single case under its own name.

use std::fmt::{self, Write};

use super::{GroupRecord, ScenarioRecord, ScenarioStatus, StepOutcome, snapshot};

const FAIL_ON_SKIPPED_MESSAGE: &str = "step skipped while skipped steps fail the run";

struct TestCase<'a> {
    name: String,
    classname: &'a str,
    outcome: Outcome<'a>,
}

enum Outcome<'a> {
    Passed,
    Failed(String),
    Skipped { reason: Option<&'a str>, forced: bool },
}

fn cases(record: &ScenarioRecord) -> Vec<TestCase<'_>> {
    let forced = matches!(
        record.status(),
        ScenarioStatus::Skipped(details) if details.forced_failure()
    );
    let classname = record.scenario_name();
    let mut cases = Vec::new();
    for group in record.groups() {
        for step in group.steps() {
            let outcome = match step.outcome() {
                StepOutcome::Passed => Outcome::Passed,
                StepOutcome::Failed(message) => Outcome::Failed(message.clone()),
                StepOutcome::Skipped(reason) => Outcome::Skipped {
                    reason: Some(reason),
                    forced,
                },
                StepOutcome::NotExecuted => continue,
            };
            cases.push(TestCase {
                name: format!("{} :: {} {}", group.label(), step.keyword(), step.message()),
                classname,
                outcome,
            });
        }
        if let Some(case) = disposal_case(group, classname) {
            cases.push(case);
        }
    }
    if cases.is_empty() {
        // Scenarios recorded without group details still get one case.
        let outcome = match record.status() {
            ScenarioStatus::Passed => Outcome::Passed,
            ScenarioStatus::Failed { failures } => Outcome::Failed(failures.join("\n")),
            ScenarioStatus::Skipped(details) => Outcome::Skipped {
                reason: None,
                forced: details.forced_failure(),
            },
        };
        cases.push(TestCase {
            name: record.scenario_name().to_string(),
            classname,
            outcome,
        });
    }
    cases
}

fn disposal_case<'a>(group: &GroupRecord, classname: &'a str) -> Option<TestCase<'a>> {
    if group.disposal_failures().is_empty() {
        return None;
    }
    Some(TestCase {
        name: format!("{} :: disposal", group.label()),
        classname,
        outcome: Outcome::Failed(group.disposal_failures().join("\n")),
    })
}

fn is_failure(outcome: &Outcome<'_>) -> bool {
    matches!(
        outcome,
        Outcome::Failed(_) | Outcome::Skipped { forced: true, .. }
    )
}

/// Render `records` as a JUnit XML document.
///
/// # Examples
///
/// ```
/// use fluent_bdd::reporting::{ScenarioRecord, ScenarioStatus, junit};
///
/// let records = vec![ScenarioRecord::new(
///     "tests/a.rs",
///     "scenario",
///     1,
///     Vec::new(),
///     ScenarioStatus::Passed,
/// )];
/// let mut output = String::new();
/// junit::write(&mut output, &records)?;
/// assert!(output.contains("<testsuite"));
/// # Ok::<(), std::fmt::Error>(())
/// ```
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write<W: Write>(writer: &mut W, records: &[ScenarioRecord]) -> fmt::Result {
    let cases: Vec<TestCase<'_>> = records.iter().flat_map(cases).collect();
    let failures = cases.iter().filter(|case| is_failure(&case.outcome)).count();
    let skipped = cases
        .iter()
        .filter(|case| matches!(case.outcome, Outcome::Skipped { .. }))
        .count();
    writer.write_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n")?;
    let tests = cases.len();
    writeln!(
        writer,
        "<testsuite name=\"fluent-bdd\" tests=\"{tests}\" failures=\"{failures}\" \
         skipped=\"{skipped}\">"
    )?;
    for case in &cases {
        write_case(writer, case)?;
    }
    writer.write_str("</testsuite>\n")
}

fn write_case<W: Write>(writer: &mut W, case: &TestCase<'_>) -> fmt::Result {
    writer.write_str("  <testcase name=\"")?;
    write_escaped(writer, &case.name)?;
    writer.write_str("\" classname=\"")?;
    write_escaped(writer, case.classname)?;
    writer.write_char('"')?;
    match &case.outcome {
        Outcome::Passed => writer.write_str(" />\n"),
        Outcome::Failed(message) => {
            writer.write_str(">\n    <failure message=\"")?;
            write_escaped(writer, message)?;
            writer.write_str("\" />\n  </testcase>\n")
        }
        Outcome::Skipped { reason, forced } => {
            writer.write_str(">\n    <skipped")?;
            if let Some(reason) = reason {
                writer.write_str(" message=\"")?;
                write_escaped(writer, reason)?;
                writer.write_char('"')?;
            }
            writer.write_str(" />\n")?;
            if *forced {
                writer.write_str("    <failure type=\"fail_on_skipped\">")?;
                writer.write_str(FAIL_ON_SKIPPED_MESSAGE)?;
                writer.write_str("</failure>\n")?;
            }
            writer.write_str("  </testcase>\n")
        }
    }
}

/// Render the collector snapshot as a JUnit XML document.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_snapshot<W: Write>(writer: &mut W) -> fmt::Result {
    write(writer, &snapshot())
}

fn write_escaped<W: Write>(writer: &mut W, value: &str) -> fmt::Result {
    for character in value.chars() {
        match character {
            '&' => writer.write_str("&amp;")?,
            '<' => writer.write_str("&lt;")?,
            '>' => writer.write_str("&gt;")?,
            '"' => writer.write_str("&quot;")?,
            '\'' => writer.write_str("&apos;")?,
            '\n' => writer.write_str("&#10;")?,
            other if is_valid_xml_character(other) => writer.write_char(other)?,
            _ => writer.write_str("&#xFFFD;")?,
        }
    }
    Ok(())
}

fn is_valid_xml_character(character: char) -> bool {
    matches!(
        u32::from(character),
        0x09 | 0x0A | 0x0D | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x1_0000..=0x10_FFFF
    )
}
