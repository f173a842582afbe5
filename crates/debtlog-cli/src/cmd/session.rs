//! `dl session`: interactive entry session over stdin.
//!
//! Each input line is one command, parsed with clap. A rejected command is
//! reported on the error stream and the session continues. Nothing is kept
//! once the session ends.

use crate::cmd::guide::{Guide, render_guide};
use crate::cmd::views::{EntryRow, render_draft, render_report, render_summary, write_placeholder};
use crate::output::{CliError, OutputMode, render, render_error_to, render_item, render_list};
use anyhow::Context;
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};
use debtlog_core::model::{EntryDraft, ParseEnumError};
use debtlog_core::{DebtlogError, DraftField, EntryId, ErrorCode, ReportSettings, Session};
use serde::Serialize;
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::{debug, info};

/// Arguments for `dl session`.
#[derive(Args, Debug, Default)]
pub struct SessionArgs {
    /// Entries listed by `report` (overrides `report.top_n`).
    #[arg(long)]
    pub top: Option<usize>,
}

#[derive(Parser, Debug)]
#[command(
    name = "session",
    no_binary_name = true,
    disable_help_subcommand = true,
    disable_version_flag = true,
    override_usage = "<COMMAND> [ARGS]"
)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// Add an entry in one step, leaving the draft untouched.
    Add(AddArgs),
    /// Set a draft field. An empty value clears it.
    Set {
        /// category, description, impact, effort, or risk.
        field: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Submit the draft as a new entry.
    Submit,
    /// Show the draft.
    Draft,
    /// Clear the draft.
    Clear,
    /// Remove an entry by ID.
    Remove {
        #[arg(allow_hyphen_values = true)]
        id: String,
    },
    /// List entries by priority, highest first.
    List,
    /// Show summary statistics.
    Summary,
    /// Show the stakeholder report.
    Report {
        /// Number of top-priority entries to include.
        #[arg(long)]
        top: Option<usize>,
    },
    /// Show the assessment guide.
    Guide { category: Option<String> },
    /// List session commands.
    Help,
    /// End the session.
    #[command(alias = "exit")]
    Quit,
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long, allow_hyphen_values = true)]
    category: Option<String>,
    #[arg(long, visible_alias = "desc", allow_hyphen_values = true)]
    description: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    impact: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    effort: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    risk: Option<String>,
}

impl AddArgs {
    fn to_draft(&self) -> Result<EntryDraft, ParseEnumError> {
        Ok(EntryDraft {
            category: parse_opt(self.category.as_deref())?,
            description: self.description.clone().unwrap_or_default(),
            impact: parse_opt(self.impact.as_deref())?,
            effort: parse_opt(self.effort.as_deref())?,
            business_risk: parse_opt(self.risk.as_deref())?,
        })
    }
}

fn parse_opt<T>(text: Option<&str>) -> Result<Option<T>, ParseEnumError>
where
    T: FromStr<Err = ParseEnumError>,
{
    text.filter(|t| !t.trim().is_empty())
        .map(str::parse)
        .transpose()
}

#[derive(Debug, Serialize)]
struct Removal {
    id: EntryId,
    removed: bool,
}

enum Flow {
    Continue,
    Quit,
}

fn coded(message: impl Into<String>, code: ErrorCode) -> CliError {
    CliError::with_details(
        message,
        code.hint().unwrap_or_else(|| code.message()),
        code.code(),
    )
}

fn rejection(err: impl Into<DebtlogError>) -> CliError {
    CliError::from(&err.into())
}

fn parse_failure(err: &clap::Error) -> CliError {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    coded(first.trim_start_matches("error: "), ErrorCode::UnknownCommand)
}

/// Split a command line into words.
///
/// Single and double quotes group words; a backslash escapes the next
/// character except inside single quotes.
fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('"') | None, '\\') => {
                current.push(chars.next().unwrap_or('\\'));
                in_word = true;
            }
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("unterminated {q} quote"));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

struct Repl<'w> {
    session: Session,
    output: OutputMode,
    out: &'w mut dyn Write,
    err: &'w mut dyn Write,
    rejected: usize,
}

impl Repl<'_> {
    fn reject(&mut self, error: &CliError) -> anyhow::Result<Flow> {
        self.rejected += 1;
        debug!(code = ?error.error_code, message = %error.message, "command rejected");
        render_error_to(self.err, self.output, error)?;
        Ok(Flow::Continue)
    }

    fn dispatch(&mut self, line: &str) -> anyhow::Result<Flow> {
        let words = match split_words(line) {
            Ok(words) => words,
            Err(message) => return self.reject(&coded(message, ErrorCode::UnknownCommand)),
        };
        if words.is_empty() {
            return Ok(Flow::Continue);
        }

        match SessionLine::try_parse_from(words.iter()) {
            Ok(parsed) => self.execute(parsed.command),
            Err(e) if e.kind() == ErrorKind::DisplayHelp => {
                write!(self.out, "{}", e.render())?;
                Ok(Flow::Continue)
            }
            Err(e) => self.reject(&parse_failure(&e)),
        }
    }

    fn execute(&mut self, command: SessionCommand) -> anyhow::Result<Flow> {
        match command {
            SessionCommand::Add(args) => {
                let draft = match args.to_draft() {
                    Ok(draft) => draft,
                    Err(e) => return self.reject(&rejection(e)),
                };
                match self.session.add(&draft) {
                    Ok(entry) => render_item(self.out, &EntryRow(entry), self.output)?,
                    Err(e) => return self.reject(&rejection(e)),
                }
            }
            SessionCommand::Set { field, value } => {
                let field: DraftField = match field.parse() {
                    Ok(field) => field,
                    Err(e) => return self.reject(&rejection(e)),
                };
                if let Err(e) = self.session.set_field(field, &value.join(" ")) {
                    return self.reject(&rejection(e));
                }
            }
            SessionCommand::Submit => match self.session.submit() {
                Ok(entry) => render_item(self.out, &EntryRow(entry), self.output)?,
                Err(e) => return self.reject(&rejection(e)),
            },
            SessionCommand::Draft => render_draft(self.out, self.output, self.session.draft())?,
            SessionCommand::Clear => self.session.clear_draft(),
            SessionCommand::Remove { id } => {
                let id: EntryId = match id.parse() {
                    Ok(id) => id,
                    Err(e) => return self.reject(&rejection(e)),
                };
                let removal = Removal {
                    id,
                    removed: self.session.remove(id).is_some(),
                };
                render(self.out, self.output, &removal, |r, w| {
                    if r.removed {
                        writeln!(w, "removed {}", r.id)
                    } else {
                        writeln!(w, "no entry {}", r.id)
                    }
                })?;
            }
            SessionCommand::List => {
                let entries = self.session.store().list_by_priority_descending();
                if entries.is_empty() && !self.output.is_json() {
                    write_placeholder(self.out)?;
                } else {
                    let rows: Vec<EntryRow<'_>> = entries.into_iter().map(EntryRow).collect();
                    render_list(self.out, &rows, self.output)?;
                }
            }
            SessionCommand::Summary => {
                render_summary(self.out, self.output, &self.session.summary())?;
            }
            SessionCommand::Report { top } => {
                let report = match top {
                    Some(n) => self.session.report_with_top(n),
                    None => self.session.report(),
                };
                render_report(self.out, self.output, &report)?;
            }
            SessionCommand::Guide { category } => {
                let category = match parse_opt(category.as_deref()) {
                    Ok(category) => category,
                    Err(e) => return self.reject(&rejection(e)),
                };
                render_guide(&Guide::new(category), self.output, self.out)?;
            }
            SessionCommand::Help => {
                write!(self.out, "{}", SessionLine::command().render_help())?;
            }
            SessionCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}

/// Execute `dl session`, reading commands from `input` until EOF or `quit`.
///
/// When `interactive` is set a banner and a prompt are written to `out`.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails. Rejected
/// commands are reported to `err` and do not end the session.
pub fn run_session(
    args: &SessionArgs,
    mut settings: ReportSettings,
    output: OutputMode,
    interactive: bool,
    input: impl BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> anyhow::Result<()> {
    if let Some(top) = args.top {
        settings.top_n = top;
    }
    info!(top_n = settings.top_n, "session started");

    let mut repl = Repl {
        session: Session::new(settings),
        output,
        out,
        err,
        rejected: 0,
    };
    if interactive {
        writeln!(
            repl.out,
            "debtlog session. Type `help` for commands, `quit` to exit."
        )?;
    }

    let mut lines = input.lines();
    loop {
        if interactive {
            write!(repl.out, "dl> ")?;
            repl.out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read session input")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if matches!(repl.dispatch(line)?, Flow::Quit) {
            break;
        }
    }

    info!(
        entries = repl.session.store().len(),
        rejected = repl.rejected,
        "session ended"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Run {
        out: String,
        err: String,
    }

    fn run_with(args: &SessionArgs, mode: OutputMode, script: &str) -> Run {
        let mut out = Vec::new();
        let mut err = Vec::new();
        run_session(
            args,
            ReportSettings::default(),
            mode,
            false,
            script.as_bytes(),
            &mut out,
            &mut err,
        )
        .unwrap();
        Run {
            out: String::from_utf8(out).unwrap(),
            err: String::from_utf8(err).unwrap(),
        }
    }

    fn run(mode: OutputMode, script: &str) -> Run {
        run_with(&SessionArgs::default(), mode, script)
    }

    fn json_stream(text: &str) -> Vec<serde_json::Value> {
        serde_json::Deserializer::from_str(text)
            .into_iter::<serde_json::Value>()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn form_flow_submits_and_lists() {
        let result = run(
            OutputMode::Text,
            "set category testing\n\
             set impact high\n\
             set effort months\n\
             set risk medium\n\
             set description flaky integration suite\n\
             submit\n\
             list\n",
        );
        assert!(result.err.is_empty(), "unexpected errors: {}", result.err);
        let lines: Vec<&str> = result.out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("  2.4  testing  high  months  medium  flaky integration suite"));
        assert!(lines[1].starts_with("ID  PRIORITY"));
        assert_eq!(lines[0], lines[2]);
    }

    #[test]
    fn rejected_commands_report_codes_and_continue() {
        let result = run(
            OutputMode::Json,
            "submit\n\
             bogus\n\
             set impact catastrophic\n\
             remove abc\n\
             add --category security --description 'hardcoded creds' --impact critical --effort weeks --risk high\n\
             list\n",
        );

        let errors = json_stream(&result.err);
        let codes: Vec<&str> = errors
            .iter()
            .map(|e| e["error"]["error_code"].as_str().unwrap())
            .collect();
        assert_eq!(codes, ["E2001", "E3001", "E2004", "E2005"]);

        let docs = json_stream(&result.out);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["priority"], 7.5);
        assert_eq!(docs[0]["description"], "hardcoded creds");
        assert_eq!(docs[1].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn add_without_effort_is_rejected() {
        let result = run(
            OutputMode::Json,
            "add --category testing --description flaky --impact high\nlist\n",
        );
        let errors = json_stream(&result.err);
        assert_eq!(errors[0]["error"]["error_code"], "E2003");
        assert_eq!(json_stream(&result.out), [serde_json::json!([])]);
    }

    #[test]
    fn add_accepts_description_starting_with_dash() {
        let result = run(
            OutputMode::Json,
            "add --category testing --description -flaky --effort weeks\nlist\n",
        );
        assert!(result.err.is_empty(), "unexpected errors: {}", result.err);
        let docs = json_stream(&result.out);
        assert_eq!(docs[0]["description"], "-flaky");
        assert_eq!(docs[1].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn negative_remove_id_is_an_invalid_id() {
        let result = run(OutputMode::Json, "remove -5\n");
        let errors = json_stream(&result.err);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0]["error"]["error_code"], "E2005");
    }

    #[test]
    fn removing_absent_id_is_a_no_op() {
        let result = run(OutputMode::Text, "remove 42\n");
        assert_eq!(result.out, "no entry 42\n");
        assert!(result.err.is_empty());
    }

    #[test]
    fn remove_by_reported_id() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut repl = Repl {
            session: Session::default(),
            output: OutputMode::Text,
            out: &mut out,
            err: &mut err,
            rejected: 0,
        };
        repl.dispatch("add --category security --description creds --effort weeks")
            .unwrap();
        let id = repl.session.store().iter().next().unwrap().id();
        repl.dispatch(&format!("remove {id}")).unwrap();
        assert!(repl.session.store().is_empty());
        assert_eq!(repl.rejected, 0);
    }

    #[test]
    fn quit_stops_reading() {
        let result = run(OutputMode::Text, "quit\nremove 1\n");
        assert!(result.out.is_empty());
        let result = run(OutputMode::Text, "exit\nremove 1\n");
        assert!(result.out.is_empty());
    }

    #[test]
    fn empty_views_show_placeholder() {
        let result = run(OutputMode::Text, "list\nreport\n");
        assert_eq!(result.out.lines().count(), 2);
        assert!(result.out.starts_with("No debt items recorded yet."));
    }

    #[test]
    fn report_top_flag_limits_entries() {
        let script = "add --category security --description a --impact critical --effort weeks\n\
                      add --category testing --description b --impact low --effort years\n\
                      report\n\
                      report --top 2\n";
        let args = SessionArgs { top: Some(1) };
        let result = run_with(&args, OutputMode::Json, script);
        let docs = json_stream(&result.out);
        assert_eq!(docs[2]["top"].as_array().map(Vec::len), Some(1));
        assert_eq!(docs[3]["top"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn draft_and_clear() {
        let result = run(
            OutputMode::Json,
            "set category architecture\nset desc \"tight coupling\"\ndraft\nclear\ndraft\n",
        );
        let docs = json_stream(&result.out);
        assert_eq!(docs[0]["category"], "architecture");
        assert_eq!(docs[0]["description"], "tight coupling");
        assert_eq!(docs[0]["can_submit"], true);
        assert_eq!(docs[1]["can_submit"], false);
    }

    #[test]
    fn help_lists_commands() {
        let result = run(OutputMode::Text, "help\n");
        for command in ["add", "set", "submit", "remove", "report", "quit"] {
            assert!(result.out.contains(command), "missing {command}");
        }
    }

    #[test]
    fn comments_and_blank_lines_are_ignored() {
        let result = run(OutputMode::Text, "# setup\n\n   \nremove 7\n");
        assert_eq!(result.out, "no entry 7\n");
    }

    #[test]
    fn split_words_handles_quotes_and_escapes() {
        assert_eq!(
            split_words(r#"set description "two words" 'and \more' three\ four"#).unwrap(),
            ["set", "description", "two words", r"and \more", "three four"]
        );
        assert_eq!(split_words(r#"set impact """#).unwrap(), ["set", "impact", ""]);
        assert!(split_words("set description \"open").is_err());
        assert!(split_words("   ").unwrap().is_empty());
    }
}
