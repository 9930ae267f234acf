use std::io::{self, BufRead, Write};

use colored::Colorize;
use rh_dice::split_items;
use rh_table::{
    AttributeRemoveRequest, AttributeSetRequest, CheckDisposition, CheckRequest, ClaimOutcome,
    EvaluateRequest, GenerateCharacterRequest, OfferResolution, Table, TableError, parse_segments,
};

pub fn run(scope: u64, subject: u64, seed: Option<u64>) -> Result<(), String> {
    let mut repl = Repl::new(super::table(seed), scope, subject);

    println!("  {} RngHelper session", "Starting".bold());
    println!("  Scope: {scope} | Subject: {subject}");
    println!("  Type 'help' for commands, 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("{}> ", repl.subject);
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match repl.process(input) {
            Ok(output) => {
                if !output.is_empty() {
                    println!("{output}\n");
                }
                if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("q") {
                    break;
                }
            }
            Err(e) => {
                tracing::debug!(subject = repl.subject, input, error = %e, "command rejected");
                println!("{}\n", e.yellow());
            }
        }
    }

    Ok(())
}

/// One interactive session over a single table, acting as one subject at a time.
struct Repl {
    table: Table,
    scope: u64,
    subject: u64,
}

impl Repl {
    fn new(table: Table, scope: u64, subject: u64) -> Self {
        Self {
            table,
            scope,
            subject,
        }
    }

    fn process(&mut self, input: &str) -> Result<String, String> {
        let parts: Vec<&str> = input.trim().splitn(2, ' ').collect();
        let cmd = parts[0].to_lowercase();
        let rest = parts.get(1).map(|s| s.trim()).unwrap_or("");

        match cmd.as_str() {
            "roll" | "r" => self.do_roll(rest),
            "check" | "ra" => self.do_check(rest),
            "set" | "st" => self.do_set(rest),
            "add" => self.do_add(rest),
            "del" => self.do_del(rest),
            "reset" => Ok(self.do_reset()),
            "name" => self.do_name(rest),
            "show" => Ok(self.do_show()),
            "gen" => self.do_gen(rest),
            "growth" => self.do_growth(rest),
            "san" => self.do_san(rest),
            "kp" => self.do_kp(rest),
            "as" => self.do_as(rest),
            "offer" | "offers" => Ok(self.do_offers()),
            "accept" => self.do_accept(rest),
            "cancel" => self.do_cancel(rest),
            "help" => Ok(HELP.to_string()),
            "quit" | "q" => Ok("Goodbye!".to_string()),
            other => Err(format!("unknown command: {other} (try 'help')")),
        }
    }

    /// The acting subject's display name, falling back to its id.
    fn who(&self) -> String {
        self.table
            .display_name(self.scope, self.subject)
            .map_or_else(|| format!("#{}", self.subject), str::to_string)
    }

    fn do_roll(&mut self, expr: &str) -> Result<String, String> {
        let result = self
            .table
            .evaluate(&EvaluateRequest {
                expr: expr.to_string(),
            })
            .map_err(|e| e.to_string())?;
        Ok(super::format_roll(&result))
    }

    fn do_check(&mut self, rest: &str) -> Result<String, String> {
        if rest.is_empty() {
            return Err("usage: check <attribute|target>".to_string());
        }
        if let Ok(target) = rest.parse::<i64>() {
            let r = self
                .table
                .check(CheckRequest { target })
                .map_err(|e| e.to_string())?;
            return Ok(format!(
                "{}: D100={}/{}: {}",
                self.who(),
                r.roll,
                r.target,
                super::paint(r.outcome)
            ));
        }
        match self
            .table
            .request_check(self.scope, self.subject, rest)
            .map_err(|e| e.to_string())?
        {
            CheckDisposition::Offered(id) => Ok(format!(
                "Check #{id} offered: {rest}. Others roll it with 'accept {id}'."
            )),
            CheckDisposition::Resolved(r) => Ok(format!(
                "{}: {} D100={}/{}: {}",
                self.who(),
                r.label,
                r.result.roll,
                r.result.target,
                super::paint(r.result.outcome)
            )),
        }
    }

    fn do_set(&mut self, rest: &str) -> Result<String, String> {
        let pairs = parse_segments(rest).map_err(|e| e.to_string())?;
        let applied = self
            .table
            .set_attributes(&AttributeSetRequest {
                scope_id: self.scope,
                subject_id: self.subject,
                pairs,
            })
            .map_err(|e| e.to_string())?;
        let shown: Vec<String> = applied
            .iter()
            .map(|(label, value)| format!("{label}={value}"))
            .collect();
        Ok(format!("Set {}", shown.join(", ")))
    }

    fn do_add(&mut self, rest: &str) -> Result<String, String> {
        let pairs = parse_segments(rest).map_err(|e| e.to_string())?;
        let changes = self
            .table
            .add_attributes(self.scope, self.subject, &pairs)
            .map_err(|e| e.to_string())?;
        let lines: Vec<String> = changes
            .iter()
            .map(|c| format!("{}: {} -> {}", c.label, c.old, c.new))
            .collect();
        Ok(lines.join("\n"))
    }

    fn do_del(&mut self, rest: &str) -> Result<String, String> {
        let labels = split_items(rest);
        if labels.is_empty() {
            return Err("usage: del <label>[, <label>...]".to_string());
        }
        let removal = self.table.remove_attributes(&AttributeRemoveRequest {
            scope_id: self.scope,
            subject_id: self.subject,
            labels,
        });

        let mut out = Vec::new();
        if !removal.removed.is_empty() {
            out.push(format!("Removed: {}", removal.removed.join(", ")));
        }
        if !removal.not_found.is_empty() {
            out.push(format!("Not found: {}", removal.not_found.join(", ")));
        }
        if removal.name_protected() {
            out.push("NAME cannot be deleted; use 'name clear' instead.".to_string());
        }
        Ok(out.join("\n"))
    }

    fn do_reset(&mut self) -> String {
        if self.table.reset(self.scope, self.subject) {
            "Attributes cleared.".to_string()
        } else {
            "Nothing to clear.".to_string()
        }
    }

    fn do_name(&mut self, rest: &str) -> Result<String, String> {
        match self
            .table
            .set_name(self.scope, self.subject, rest)
            .map_err(|e| e.to_string())?
        {
            Some(name) => Ok(format!("Name set to {name}.")),
            None => Ok("Name cleared.".to_string()),
        }
    }

    fn do_show(&self) -> String {
        let sheet = self.table.sheet(self.scope, self.subject);
        if sheet.is_empty() {
            return format!("{} has no attributes.", self.who());
        }
        format!("{}\n{sheet}", self.who().bold())
    }

    fn do_gen(&mut self, rest: &str) -> Result<String, String> {
        if rest.is_empty() {
            let generated = self
                .table
                .generate_character(GenerateCharacterRequest {
                    scope_id: self.scope,
                    subject_id: self.subject,
                })
                .map_err(|e| e.to_string())?;
            return Ok(format!("{}\nSaved to {}.", generated.block, self.who()));
        }
        let count: usize = rest
            .parse()
            .map_err(|_| format!("invalid count: {rest}"))?;
        let candidates = self
            .table
            .generate_candidates(count)
            .map_err(|e| e.to_string())?;
        let blocks: Vec<String> = candidates
            .iter()
            .enumerate()
            .map(|(i, c)| format!("Candidate {}:\n{}", i + 1, c.render_block()))
            .collect();
        Ok(blocks.join("\n\n"))
    }

    fn do_growth(&mut self, label: &str) -> Result<String, String> {
        if label.is_empty() {
            return Err("usage: growth <attribute>".to_string());
        }
        let report = self
            .table
            .growth(self.scope, self.subject, label)
            .map_err(|e| e.to_string())?;
        Ok(format!("{}: {report}", self.who()))
    }

    fn do_san(&mut self, rest: &str) -> Result<String, String> {
        let Some((on_success, on_failure)) = rest.split_once('/') else {
            return Err("usage: san <success loss>/<failure loss>, e.g. san 0/1d6".to_string());
        };
        match self
            .table
            .request_sanity(self.scope, self.subject, on_success, on_failure)
            .map_err(|e| e.to_string())?
        {
            CheckDisposition::Offered(id) => Ok(format!(
                "Sanity check #{id} offered ({rest}). Others roll it with 'accept {id}'."
            )),
            CheckDisposition::Resolved(report) => Ok(format!("{}: {report}", self.who())),
        }
    }

    fn do_kp(&mut self, rest: &str) -> Result<String, String> {
        match rest.to_lowercase().as_str() {
            "claim" => match self
                .table
                .claim_moderator(self.scope, self.subject)
                .map_err(|e| e.to_string())?
            {
                ClaimOutcome::Claimed => Ok(format!("{} is now the moderator.", self.who())),
                ClaimOutcome::AlreadyHolder => {
                    Ok(format!("{} is already the moderator.", self.who()))
                }
            },
            "release" => {
                if self.table.release_moderator(self.scope, self.subject) {
                    Ok("Moderator role released.".to_string())
                } else {
                    Err(TableError::NotModerator.to_string())
                }
            }
            "who" | "" => Ok(match self.table.moderator(self.scope) {
                Some(holder) => format!("Moderator: #{holder}"),
                None => "No moderator in this scope.".to_string(),
            }),
            _ => Err("usage: kp claim|release|who".to_string()),
        }
    }

    fn do_as(&mut self, rest: &str) -> Result<String, String> {
        let subject: u64 = rest
            .parse()
            .map_err(|_| "usage: as <subject id>".to_string())?;
        self.subject = subject;
        Ok(format!("Now acting as {}.", self.who()))
    }

    fn do_offers(&self) -> String {
        let lines: Vec<String> = self
            .table
            .pending(self.scope)
            .map(|offer| format!("  {offer}"))
            .collect();
        if lines.is_empty() {
            return "No pending checks.".to_string();
        }
        format!("Pending checks:\n{}", lines.join("\n"))
    }

    fn do_accept(&mut self, rest: &str) -> Result<String, String> {
        let id = parse_id(rest, "accept")?;
        match self
            .table
            .accept(self.scope, self.subject, id)
            .map_err(|e| e.to_string())?
        {
            OfferResolution::Skill(r) => Ok(format!(
                "{}: {} D100={}/{}: {}",
                self.who(),
                r.label,
                r.result.roll,
                r.result.target,
                super::paint(r.result.outcome)
            )),
            OfferResolution::Sanity(report) => Ok(format!("{}: {report}", self.who())),
        }
    }

    fn do_cancel(&mut self, rest: &str) -> Result<String, String> {
        let id = parse_id(rest, "cancel")?;
        let offer = self
            .table
            .cancel(self.scope, self.subject, id)
            .map_err(|e| e.to_string())?;
        Ok(format!("Cancelled {offer}."))
    }
}

fn parse_id(rest: &str, cmd: &str) -> Result<u64, String> {
    rest.trim_start_matches('#')
        .parse()
        .map_err(|_| format!("usage: {cmd} <offer id>"))
}

const HELP: &str = "\
Commands:
  roll <expr>                   Evaluate a dice expression (3d6*5, d100-10)
  check <attribute|target>      Percentile check (moderators offer it instead)
  set <label value>, ...        Set attributes (STR:50, Move Rate 8)
  add <label delta>, ...        Add to attributes
  del <label>, ...              Remove attributes
  reset                         Remove all attributes (releases moderator role)
  name <name|clear>             Set or clear the display name
  show                          Show the attribute sheet
  gen [count]                   Generate and save a character, or list candidates
  growth <attribute>            Growth check
  san <success>/<failure>       Sanity check, e.g. san 0/1d6
  kp claim|release|who          Moderator role
  as <subject>                  Act as another subject
  offer                         List pending checks
  accept <id>                   Roll a pending check
  cancel <id>                   Close a pending check (moderator)
  help                          Show this help
  quit                          Exit";
