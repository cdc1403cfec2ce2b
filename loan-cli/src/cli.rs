use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use loan_core::sorting::SortField;
use loan_core::{ApplicationStatus, Role};

use crate::config::Overrides;

// ─── top level ───────────────────────────────────────────────────────────────

/// Client for the loan marketplace.
///
/// Borrowers submit loan requests and apply to matching lenders; lenders
/// manage eligibility rules and review incoming applications. The loan
/// calculator works offline once signed in.
#[derive(Debug, Parser)]
#[command(name = "loan-cli", version)]
pub struct Cli {
    /// Config file. Defaults to `loan-cli.toml` in the working directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend implementation to use.
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Backend base URL, e.g. `http://localhost:8080`.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Where the session token is stored between runs.
    #[arg(long, global = true)]
    pub token_file: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `loan_http=trace`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Also append log records to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            backend: self.backend.clone(),
            base_url: self.base_url.clone(),
            token_file: self.token_file.clone(),
            log_level: self.log_level.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive loan calculator with history.
    Calculator,

    /// Calculates a single loan and prints the result.
    Calc(CalcArgs),

    /// Signs in and stores the session token.
    Login(LoginArgs),

    /// Forgets the stored session token.
    Logout,

    /// Creates a borrower or lender account.
    Register(RegisterArgs),

    /// Borrower loan requests.
    #[command(subcommand)]
    Request(RequestCommand),

    /// Lenders whose rules match a loan request.
    Lenders(LendersArgs),

    /// Applies a loan request to one or more lenders.
    Apply(ApplyArgs),

    /// Loan applications, sent or received.
    #[command(subcommand)]
    Applications(ApplicationsCommand),

    /// Lender eligibility rules.
    #[command(subcommand)]
    Rules(RulesCommand),

    /// Shows where a path leads for the current session.
    Route {
        /// e.g. `/borrower/my-applications`
        path: String,
    },
}

// ─── calculator ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CalcArgs {
    /// Principal, e.g. `1,00,000`.
    #[arg(long)]
    pub amount: String,

    /// Annual interest rate in percent.
    #[arg(long)]
    pub rate: String,

    #[arg(long, default_value_t = 0)]
    pub years: u32,

    #[arg(long, default_value_t = 0)]
    pub months: u32,

    /// Print the month-by-month schedule.
    #[arg(long)]
    pub schedule: bool,

    /// Save the text report. Without a path it is written to
    /// `loan-calculation-YYYY-MM-DD.txt`.
    #[arg(long, num_args = 0..=1)]
    pub report: Option<Option<PathBuf>>,
}

// ─── accounts ────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Borrower,
    Lender,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Borrower => Role::Borrower,
            RoleArg::Lender => Role::Lender,
        }
    }
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    /// Must match `--password` when given.
    #[arg(long)]
    pub confirm_password: Option<String>,

    #[arg(long, value_enum, default_value_t = RoleArg::Borrower)]
    pub role: RoleArg,

    #[arg(long, default_value = "")]
    pub first_name: String,

    #[arg(long, default_value = "")]
    pub last_name: String,

    #[arg(long, default_value = "")]
    pub phone: String,

    #[arg(long, default_value = "")]
    pub address: String,

    /// Lenders only.
    #[arg(long, default_value = "")]
    pub company_name: String,

    /// Lenders only.
    #[arg(long, default_value = "")]
    pub license_number: String,
}

// ─── borrower ────────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum RequestCommand {
    /// Submits a new loan request.
    Create(LoanRequestArgs),

    /// Lists your loan requests.
    List,
}

#[derive(Debug, Args)]
pub struct LoanRequestArgs {
    #[arg(long)]
    pub amount: String,

    /// e.g. HOME, CAR, EDUCATION, PERSONAL.
    #[arg(long, default_value = "")]
    pub purpose: String,

    #[arg(long, default_value = "SALARIED")]
    pub employment_status: String,

    #[arg(long, default_value_t = 0)]
    pub credit_score: u32,

    #[arg(long, default_value_t = 0)]
    pub age: u32,

    /// Monthly salary.
    #[arg(long, default_value = "")]
    pub salary: String,
}

#[derive(Debug, Args)]
pub struct LendersArgs {
    /// Loan request id.
    #[arg(long)]
    pub request: i64,

    #[arg(long, default_value = "0")]
    pub salary: String,
}

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Loan request id.
    #[arg(long)]
    pub request: i64,

    /// Rule id of a lender to apply to. Repeat for several lenders.
    #[arg(long = "rule")]
    pub rules: Vec<i64>,
}

// ─── applications ────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ApplicationsCommand {
    /// Applications you sent (borrower).
    Mine(ListArgs),

    /// Applications sent to you (lender).
    Incoming(ListArgs),

    /// Approves, rejects or otherwise updates an incoming application.
    SetStatus {
        #[arg(long)]
        id: i64,

        /// PENDING, UNDER_REVIEW, APPROVED or REJECTED.
        #[arg(long, value_parser = parse_status)]
        status: ApplicationStatus,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Html,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Html => "html",
        }
    }
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Column to sort on. Giving the same column twice sorts descending.
    #[arg(long = "sort", value_parser = parse_sort_field)]
    pub sort: Vec<SortField>,

    /// Write the list to a file instead of printing it.
    #[arg(long, value_enum)]
    pub export: Option<ExportFormat>,

    /// Export path. Defaults to a dated file name in the working directory.
    #[arg(long, requires = "export")]
    pub out: Option<PathBuf>,
}

// ─── lender rules ────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum RulesCommand {
    /// Lists your rules.
    List,

    /// Creates a rule.
    Create(RuleArgs),

    /// Changes the given fields of an existing rule.
    Update {
        #[arg(long)]
        id: i64,

        #[command(flatten)]
        rule: RuleArgs,
    },

    /// Deletes a rule.
    Delete {
        #[arg(long)]
        id: i64,
    },
}

/// Rule fields. Omitted fields keep their current (or default) value.
#[derive(Debug, Default, Args)]
pub struct RuleArgs {
    #[arg(long)]
    pub min_salary: Option<String>,

    #[arg(long)]
    pub min_amount: Option<String>,

    #[arg(long)]
    pub max_amount: Option<String>,

    /// Annual interest rate in percent.
    #[arg(long)]
    pub rate: Option<String>,

    #[arg(long)]
    pub min_credit_score: Option<u32>,

    #[arg(long)]
    pub min_age: Option<u32>,

    #[arg(long)]
    pub max_age: Option<u32>,

    #[arg(long)]
    pub employment_types: Option<String>,

    /// ACTIVE or INACTIVE.
    #[arg(long)]
    pub status: Option<String>,
}

fn parse_status(s: &str) -> Result<ApplicationStatus, String> {
    ApplicationStatus::parse(s).ok_or_else(|| format!("unknown status '{s}'"))
}

fn parse_sort_field(s: &str) -> Result<SortField, String> {
    SortField::parse(s).ok_or_else(|| format!("unknown column '{s}'"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("loan-cli").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn global_flags_become_overrides() {
        let cli = parse(&["--base-url", "http://api", "logout", "--log-level", "debug"]);

        let overrides = cli.overrides();
        assert_eq!(overrides.base_url.as_deref(), Some("http://api"));
        assert_eq!(overrides.log_level.as_deref(), Some("debug"));
        assert!(overrides.backend.is_none());
    }

    #[test]
    fn calc_report_flag_with_and_without_path() {
        let Command::Calc(bare) = parse(&["calc", "--amount", "1", "--rate", "1", "--report"]).command
        else {
            panic!("expected calc");
        };
        assert_eq!(bare.report, Some(None));

        let Command::Calc(named) =
            parse(&["calc", "--amount", "1", "--rate", "1", "--report", "out.txt"]).command
        else {
            panic!("expected calc");
        };
        assert_eq!(named.report, Some(Some(PathBuf::from("out.txt"))));
    }

    #[test]
    fn repeated_rule_flags_collect() {
        let Command::Apply(args) =
            parse(&["apply", "--request", "12", "--rule", "4", "--rule", "9"]).command
        else {
            panic!("expected apply");
        };

        assert_eq!(args.rules, vec![4, 9]);
    }

    #[test]
    fn sort_and_status_use_domain_parsers() {
        let Command::Applications(ApplicationsCommand::Mine(list)) =
            parse(&["applications", "mine", "--sort", "loanAmount", "--sort", "date"]).command
        else {
            panic!("expected applications mine");
        };
        assert_eq!(list.sort, vec![SortField::LoanAmount, SortField::ApplicationDate]);

        let Command::Applications(ApplicationsCommand::SetStatus { status, .. }) =
            parse(&["applications", "set-status", "--id", "3", "--status", "under_review"]).command
        else {
            panic!("expected set-status");
        };
        assert_eq!(status, ApplicationStatus::UnderReview);
    }

    #[test]
    fn unknown_sort_column_is_rejected() {
        let result = Cli::try_parse_from(["loan-cli", "applications", "mine", "--sort", "colour"]);

        assert!(result.is_err());
    }

    #[test]
    fn out_requires_export() {
        let result = Cli::try_parse_from(["loan-cli", "applications", "mine", "--out", "x.csv"]);

        assert!(result.is_err());
    }
}
