//! Command dispatch for `loan-cli`.
//!
//! Each subcommand maps to one view of the marketplace. Views behind sign-in
//! go through the route guard first; backend failures are reported with the
//! same wording the forms use.

use std::fs;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;
use tracing::{debug, info};

use loan_core::api::{
    ApiError, ClientRegistry, MarketplaceClient, Operation, apply_to_lenders, user_message,
};
use loan_core::export::{
    ExportRow, calculation_report_file_name, export_file_name, to_csv, to_html,
};
use loan_core::routes::{self, Route, RouteDecision};
use loan_core::sorting::{SortField, SortState, Sortable};
use loan_core::validation::{
    RegisterForm, validate_lender_selection, validate_loan_request, validate_login, validate_rule,
};
use loan_core::{
    CalculatorSession, CreateLoanRequest, CreateRule, LoanTerms, LoginRequest, SessionContext,
};
use loan_http::HttpClientFactory;

use crate::cli::{
    ApplicationsCommand, ApplyArgs, CalcArgs, Command, ExportFormat, LendersArgs, ListArgs,
    LoanRequestArgs, LoginArgs, RegisterArgs, RequestCommand, RuleArgs, RulesCommand,
};
use crate::prompt::CalculatorPrompt;
use crate::render;
use crate::utils::parse_amount;

/// Registry with every backend this binary ships.
pub fn build_registry() -> ClientRegistry {
    let mut registry = ClientRegistry::new();
    registry.register(Box::new(HttpClientFactory));
    registry
}

/// Turns a backend failure into the message the user sees.
fn backend_error(op: Operation) -> impl FnOnce(ApiError) -> anyhow::Error {
    move |err| {
        debug!(?op, error = %err, "backend call failed");
        anyhow!(user_message(op, &err))
    }
}

pub struct App {
    session: Arc<SessionContext>,
    client: Arc<dyn MarketplaceClient>,
}

impl App {
    pub fn new(
        session: Arc<SessionContext>,
        client: Arc<dyn MarketplaceClient>,
    ) -> Self {
        Self { session, client }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Runs one command. `input` is only read by the interactive calculator.
    pub async fn run<R: BufRead, W: Write>(
        &self,
        command: Command,
        input: R,
        output: &mut W,
    ) -> Result<()> {
        let text = match command {
            Command::Calculator => {
                self.guard(Route::LoanCalculator)?;
                return CalculatorPrompt::new().run(input, output);
            }
            Command::Calc(args) => self.calc(args)?,
            Command::Login(args) => self.login(args).await?,
            Command::Logout => self.logout()?,
            Command::Register(args) => self.register(args).await?,
            Command::Request(RequestCommand::Create(args)) => self.create_request(args).await?,
            Command::Request(RequestCommand::List) => self.list_requests().await?,
            Command::Lenders(args) => self.lenders(args).await?,
            Command::Apply(args) => self.apply(args).await?,
            Command::Applications(ApplicationsCommand::Mine(args)) => {
                self.my_applications(args).await?
            }
            Command::Applications(ApplicationsCommand::Incoming(args)) => {
                self.incoming_applications(args).await?
            }
            Command::Applications(ApplicationsCommand::SetStatus { id, status }) => {
                self.guard(Route::IncomingApplications)?;
                self.client
                    .update_loan_status(id, status)
                    .await
                    .map_err(backend_error(Operation::UpdateApplicationStatus))?;
                format!("Application #{id} marked {}.", status.as_str())
            }
            Command::Rules(command) => self.rules(command).await?,
            Command::Route { path } => self.route(&path),
        };
        writeln!(output, "{text}")?;
        Ok(())
    }

    /// Refuses views that need a sign-in when the session has no token.
    fn guard(
        &self,
        route: Route,
    ) -> Result<()> {
        match routes::guard(route, &self.session) {
            RouteDecision::Allow(_) => Ok(()),
            RouteDecision::Redirect(to) => {
                debug!(from = route.path(), to = to.path(), "redirected by guard");
                bail!(
                    "{} requires sign-in; run `loan-cli login` first ({})",
                    route.path(),
                    to.path()
                )
            }
        }
    }

    fn route(
        &self,
        path: &str,
    ) -> String {
        let route = Route::parse(path);
        match routes::guard(route, &self.session) {
            RouteDecision::Allow(r) => format!("Allow: {}", r.path()),
            RouteDecision::Redirect(r) => {
                format!("Redirect: {} (sign in to reach {})", r.path(), route.path())
            }
        }
    }

    // ─── calculator ──────────────────────────────────────────────────────────

    fn calc(
        &self,
        args: CalcArgs,
    ) -> Result<String> {
        self.guard(Route::LoanCalculator)?;

        let mut session = CalculatorSession::new();
        session.form = LoanTerms::from_years_months(
            parse_amount(&args.amount)?,
            parse_amount(&args.rate)?,
            args.years,
            args.months,
        );
        let Some(record) = session.calculate() else {
            bail!(render::NOT_READY);
        };
        let mut out = render::result_summary(&record.terms, &record.result);

        if args.schedule {
            out.push_str("\n\n");
            out.push_str(&render::schedule(session.amortization_schedule()));
        }
        if let Some(path) = args.report {
            let path = path.unwrap_or_else(|| {
                PathBuf::from(calculation_report_file_name(Local::now().date_naive()))
            });
            fs::write(&path, session.report()?)
                .with_context(|| format!("cannot write report to '{}'", path.display()))?;
            info!(path = %path.display(), "calculation report saved");
            out.push_str(&format!("\n\nReport saved to {}", path.display()));
        }
        Ok(out)
    }

    // ─── accounts ────────────────────────────────────────────────────────────

    async fn login(
        &self,
        args: LoginArgs,
    ) -> Result<String> {
        let request = LoginRequest {
            user_name: args.username,
            password: args.password,
        };
        validate_login(&request)?;

        let response = self
            .client
            .login(&request)
            .await
            .map_err(backend_error(Operation::Login))?;
        self.session.set_token(&response.token)?;
        info!(user = %request.user_name, role = response.role.as_str(), "signed in");

        Ok(format!(
            "Logged in as {} ({}). Dashboard: {}",
            request.user_name,
            response.role.as_str(),
            Route::dashboard_for(response.role).path()
        ))
    }

    fn logout(&self) -> Result<String> {
        self.session.logout()?;
        Ok("Logged out.".to_string())
    }

    async fn register(
        &self,
        args: RegisterArgs,
    ) -> Result<String> {
        let request = RegisterForm {
            user_name: args.username,
            email: args.email,
            password: args.password,
            confirm_password: args.confirm_password,
            role: args.role.into(),
            first_name: args.first_name,
            last_name: args.last_name,
            phone_number: args.phone,
            address: args.address,
            company_name: args.company_name,
            license_number: args.license_number,
        }
        .into_request()?;

        self.client
            .register(&request)
            .await
            .map_err(backend_error(Operation::Register))?;
        Ok("Registration successful! Please log in with your credentials.".to_string())
    }

    // ─── borrower ────────────────────────────────────────────────────────────

    async fn create_request(
        &self,
        args: LoanRequestArgs,
    ) -> Result<String> {
        self.guard(Route::ApplyLoan)?;
        let request = CreateLoanRequest {
            loan_amount: parse_amount(&args.amount)?,
            loan_purpose: args.purpose,
            employment_status: args.employment_status,
            credit_score: args.credit_score,
            age: args.age,
            salary: parse_amount(&args.salary)?,
        };
        validate_loan_request(&request)?;

        let created = self
            .client
            .create_loan_request(&request)
            .await
            .map_err(backend_error(Operation::CreateLoanRequest))?;
        Ok(format!(
            "Loan request #{} submitted. Find lenders with `loan-cli lenders --request {}`.",
            created.id, created.id
        ))
    }

    async fn list_requests(&self) -> Result<String> {
        self.guard(Route::BorrowerDashboard)?;
        let requests = self
            .client
            .my_loan_requests()
            .await
            .map_err(backend_error(Operation::LoadRequests))?;
        Ok(render::loan_requests(&requests))
    }

    async fn lenders(
        &self,
        args: LendersArgs,
    ) -> Result<String> {
        self.guard(Route::EligibleLenders)?;
        let lenders = self
            .client
            .eligible_lenders(args.request, parse_amount(&args.salary)?)
            .await
            .map_err(backend_error(Operation::FindLenders))?;
        Ok(render::lenders(&lenders))
    }

    async fn apply(
        &self,
        args: ApplyArgs,
    ) -> Result<String> {
        self.guard(Route::EligibleLenders)?;
        validate_lender_selection(&args.rules)?;

        apply_to_lenders(self.client.as_ref(), args.request, &args.rules)
            .await
            .map_err(backend_error(Operation::ApplyToLenders))?;
        Ok("Successfully applied to selected lenders!".to_string())
    }

    // ─── application lists ───────────────────────────────────────────────────

    async fn my_applications(
        &self,
        args: ListArgs,
    ) -> Result<String> {
        self.guard(Route::MyApplications)?;
        let apps = self
            .client
            .borrower_applications()
            .await
            .map_err(backend_error(Operation::LoadApplications))?;
        let apps = sorted(apps, &args.sort);
        match args.export {
            Some(format) => export(&apps, format, args.out),
            None => Ok(render::my_applications(&apps)),
        }
    }

    async fn incoming_applications(
        &self,
        args: ListArgs,
    ) -> Result<String> {
        self.guard(Route::IncomingApplications)?;
        let apps = self
            .client
            .lender_applications()
            .await
            .map_err(backend_error(Operation::LoadApplications))?;
        let apps = sorted(apps, &args.sort);
        match args.export {
            Some(format) => export(&apps, format, args.out),
            None => Ok(render::incoming_applications(&apps)),
        }
    }

    // ─── lender rules ────────────────────────────────────────────────────────

    async fn rules(
        &self,
        command: RulesCommand,
    ) -> Result<String> {
        match command {
            RulesCommand::List => {
                self.guard(Route::MyRules)?;
                let rules = self
                    .client
                    .my_rules()
                    .await
                    .map_err(backend_error(Operation::LoadRules))?;
                Ok(render::rules(&rules))
            }
            RulesCommand::Create(args) => {
                self.guard(Route::CreateRule)?;
                let mut rule = CreateRule::default();
                merge_rule(&mut rule, args)?;
                validate_rule(&rule)?;
                let created = self
                    .client
                    .create_rule(&rule)
                    .await
                    .map_err(backend_error(Operation::CreateRule))?;
                Ok(format!("Rule #{} created.", created.id))
            }
            RulesCommand::Update { id, rule: args } => {
                self.guard(Route::MyRules)?;
                let existing = self
                    .client
                    .my_rules()
                    .await
                    .map_err(backend_error(Operation::LoadRules))?
                    .into_iter()
                    .find(|r| r.id == id)
                    .with_context(|| format!("Rule #{id} not found"))?;
                let mut rule = CreateRule::from(existing);
                merge_rule(&mut rule, args)?;
                validate_rule(&rule)?;
                self.client
                    .update_rule(id, &rule)
                    .await
                    .map_err(backend_error(Operation::UpdateRule))?;
                Ok(format!("Rule #{id} updated."))
            }
            RulesCommand::Delete { id } => {
                self.guard(Route::MyRules)?;
                self.client
                    .delete_rule(id)
                    .await
                    .map_err(backend_error(Operation::DeleteRule))?;
                Ok(format!("Rule #{id} deleted."))
            }
        }
    }
}

/// Overwrites the fields given on the command line.
fn merge_rule(
    rule: &mut CreateRule,
    args: RuleArgs,
) -> Result<()> {
    if let Some(v) = args.min_salary {
        rule.minimum_salary = parse_amount(&v)?;
    }
    if let Some(v) = args.min_amount {
        rule.minimum_loan_amount = parse_amount(&v)?;
    }
    if let Some(v) = args.max_amount {
        rule.maximum_loan_amount = parse_amount(&v)?;
    }
    if let Some(v) = args.rate {
        rule.interest_rate = parse_amount(&v)?;
    }
    if let Some(v) = args.min_credit_score {
        rule.minimum_credit_score = v;
    }
    if let Some(v) = args.min_age {
        rule.minimum_age = v;
    }
    if let Some(v) = args.max_age {
        rule.maximum_age = v;
    }
    if let Some(v) = args.employment_types {
        rule.employment_types = v;
    }
    if let Some(v) = args.status {
        rule.rule_status = v;
    }
    Ok(())
}

/// Applies the column picks in order, as repeated header clicks would.
fn sorted<R: Sortable>(
    mut rows: Vec<R>,
    fields: &[SortField],
) -> Vec<R> {
    let mut state = SortState::default();
    for field in fields {
        state.toggle(*field);
    }
    state.apply(&mut rows);
    rows
}

fn export<R: ExportRow>(
    rows: &[R],
    format: ExportFormat,
    out: Option<PathBuf>,
) -> Result<String> {
    let today = Local::now().date_naive();
    let content = match format {
        ExportFormat::Csv => to_csv(rows)?,
        ExportFormat::Html => to_html(rows, today)?,
    };
    let path =
        out.unwrap_or_else(|| PathBuf::from(export_file_name::<R>(format.extension(), today)));
    fs::write(&path, content)
        .with_context(|| format!("cannot write export to '{}'", path.display()))?;
    info!(path = %path.display(), rows = rows.len(), "applications exported");

    Ok(format!(
        "Exported {} applications to {}",
        rows.len(),
        path.display()
    ))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use loan_core::api::testing::StubClient;
    use loan_core::{LoanApplication, Role};

    use super::*;

    fn application(
        id: i64,
        amount: f64,
    ) -> LoanApplication {
        LoanApplication {
            loan_application_id: id,
            loan_purpose: "HOME".to_string(),
            borrower_name: format!("Borrower {id}"),
            status: "PENDING".to_string(),
            loan_amount: amount,
            credit_score: 700,
            age: 30,
            employment_status: "SALARIED".to_string(),
            application_date: None,
        }
    }

    #[test]
    fn registry_ships_http_backend() {
        assert_eq!(build_registry().available_backends(), vec!["http"]);
    }

    #[test]
    fn repeated_sort_field_sorts_descending() {
        let rows = vec![application(1, 5.0), application(2, 9.0), application(3, 1.0)];

        let asc = sorted(rows.clone(), &[SortField::LoanAmount]);
        let desc = sorted(rows, &[SortField::LoanAmount, SortField::LoanAmount]);

        let ids = |rows: &[LoanApplication]| -> Vec<i64> {
            rows.iter().map(|r| r.loan_application_id).collect()
        };
        assert_eq!(ids(&asc), vec![3, 1, 2]);
        assert_eq!(ids(&desc), vec![2, 1, 3]);
    }

    #[test]
    fn merge_rule_only_touches_given_fields() {
        let mut rule = CreateRule {
            interest_rate: 11.0,
            minimum_age: 21,
            ..CreateRule::default()
        };

        merge_rule(
            &mut rule,
            RuleArgs {
                rate: Some("9.5".to_string()),
                ..RuleArgs::default()
            },
        )
        .unwrap();

        assert_eq!(rule.interest_rate, 9.5);
        assert_eq!(rule.minimum_age, 21);
    }

    #[test]
    fn guard_names_login_for_anonymous_user() {
        let app = App::new(
            Arc::new(SessionContext::in_memory()),
            Arc::new(StubClient::default()),
        );

        let err = app.guard(Route::MyRules).unwrap_err();

        assert_eq!(
            err.to_string(),
            "/lender/my-rules requires sign-in; run `loan-cli login` first (/login)"
        );
    }

    #[tokio::test]
    async fn login_reports_dashboard_for_role() {
        let mut client = StubClient::default();
        client.role = Some(Role::Lender);
        let app = App::new(Arc::new(SessionContext::in_memory()), Arc::new(client));

        let text = app
            .login(LoginArgs {
                username: "acme".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(text, "Logged in as acme (LENDER). Dashboard: /lender");
        assert_eq!(app.session().token().as_deref(), Some("token-for-acme"));
    }
}
