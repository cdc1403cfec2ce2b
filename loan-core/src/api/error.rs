//! Backend failures and the messages shown for them.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The backend answered with a non-success status. `message` is the
    /// `message` field of the JSON error body, when there was one.
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        status: u16,
        message: Option<String>,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Backend-supplied message, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// What the user was doing when a call failed. Picks the message table in
/// [`user_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    Register,
    CreateLoanRequest,
    CreateRule,
    UpdateRule,
    DeleteRule,
    ApplyToLenders,
    LoadRequests,
    FindLenders,
    LoadRules,
    LoadApplications,
    UpdateApplicationStatus,
}

impl Operation {
    /// Verb used inside the rule-editing messages.
    fn rule_verb(&self) -> &'static str {
        match self {
            Self::UpdateRule => "update",
            Self::DeleteRule => "delete",
            _ => "create",
        }
    }
}

/// Turns a failed call into the sentence shown to the user.
///
/// The HTTP status picks the message; for some statuses keywords in the
/// backend's own message refine it. Anything unmatched falls back to the
/// backend message, then to a generic sentence for the operation.
pub fn user_message(
    operation: Operation,
    error: &ApiError,
) -> String {
    let reply = Reply {
        status: error.status(),
        message: error.backend_message().unwrap_or_default(),
    };

    match operation {
        Operation::Login => login(&reply),
        Operation::Register => register(&reply),
        Operation::CreateLoanRequest => create_loan_request(&reply),
        Operation::CreateRule => create_rule(&reply),
        Operation::UpdateRule | Operation::DeleteRule => edit_rule(&reply, operation.rule_verb()),
        Operation::ApplyToLenders => apply_to_lenders(&reply),
        Operation::LoadRequests => reply.or("Failed to load requests"),
        Operation::FindLenders => reply.or("Failed to find eligible lenders"),
        Operation::LoadRules => reply.or("Failed to load rules"),
        Operation::LoadApplications => reply.or("Failed to load applications"),
        Operation::UpdateApplicationStatus => reply.or("Failed to update application status"),
    }
}

struct Reply<'a> {
    status: Option<u16>,
    message: &'a str,
}

impl Reply<'_> {
    fn mentions(
        &self,
        keyword: &str,
    ) -> bool {
        self.message.to_lowercase().contains(keyword)
    }

    /// The backend message, or `fallback` when it sent none.
    fn or(
        &self,
        fallback: &str,
    ) -> String {
        if self.message.is_empty() {
            fallback.to_string()
        } else {
            self.message.to_string()
        }
    }
}

const SERVER_ERROR: &str = "Server error. Please try again later.";
const LOG_IN_AGAIN: &str = "Authentication required. Please log in again.";
const CHECK_ALL_FIELDS: &str = "Please check all fields and ensure they are valid.";
const SIMILAR_RULE: &str = "A similar lending rule already exists. Please modify your criteria.";
const RULE_DATA_INVALID: &str = "Rule data is invalid. Please check all fields.";
const SIMILAR_REQUEST: &str =
    "You already have a similar loan request. Please check your existing requests.";

fn login(r: &Reply<'_>) -> String {
    let text = match r.status {
        Some(400) if r.mentions("invalid credentials") || r.mentions("wrong password") => {
            "Incorrect username or password. Please try again."
        }
        Some(400) if r.mentions("validation") => "Please enter valid username and password.",
        Some(400) => "Invalid login data. Please check your credentials.",
        Some(401) => "Incorrect username or password. Please try again.",
        Some(404) => "User not found. Please check your username or register for a new account.",
        Some(403) => "Account is disabled. Please contact support.",
        Some(500) => SERVER_ERROR,
        _ if r.mentions("invalid credentials") => "Incorrect username or password.",
        _ if r.mentions("user not found") => "User not found. Please check your username.",
        _ if r.mentions("wrong password") => "Incorrect password. Please try again.",
        _ => return r.or("Login failed. Please try again."),
    };
    text.to_string()
}

fn register(r: &Reply<'_>) -> String {
    let text = match r.status {
        Some(400) if r.mentions("username") && r.mentions("taken") => {
            "Username is already taken. Please choose a different username."
        }
        Some(400) if r.mentions("email") && r.mentions("taken") => {
            "Email is already registered. Please use a different email or try logging in."
        }
        Some(400) if r.mentions("validation") => CHECK_ALL_FIELDS,
        Some(400) if r.mentions("password") => {
            "Password does not meet requirements. Please use a stronger password."
        }
        Some(400) => "Invalid registration data. Please check your information.",
        Some(409) if r.mentions("username") => {
            "Username already exists. Please choose a different username."
        }
        Some(409) if r.mentions("email") => "Email already registered. Please use a different email.",
        Some(409) => "Account already exists. Please try logging in instead.",
        Some(422) => "Invalid data provided. Please check all fields and try again.",
        Some(500) => "Server error during registration. Please try again later.",
        _ if r.mentions("username taken") => "Username is already taken. Please choose another.",
        _ if r.mentions("email exists") => {
            "Email is already registered. Please use a different email."
        }
        _ if r.mentions("duplicate") => "Account with this information already exists.",
        _ => return r.or("Registration failed. Please try again."),
    };
    text.to_string()
}

fn create_loan_request(r: &Reply<'_>) -> String {
    let text = match r.status {
        Some(400) if r.mentions("validation") => CHECK_ALL_FIELDS,
        Some(400) if r.mentions("duplicate") => SIMILAR_REQUEST,
        Some(400) => "Invalid loan request data. Please check your information.",
        Some(401) => LOG_IN_AGAIN,
        Some(403) => "You do not have permission to create loan requests.",
        Some(409) => SIMILAR_REQUEST,
        Some(422) => "Loan request data is invalid. Please check all fields.",
        Some(500) => SERVER_ERROR,
        _ if r.mentions("duplicate") => "You already have a similar loan request.",
        _ if r.mentions("invalid") => "Invalid loan request data provided.",
        _ => return r.or("Failed to create loan request. Please try again."),
    };
    text.to_string()
}

fn create_rule(r: &Reply<'_>) -> String {
    let text = match r.status {
        Some(400) if r.mentions("validation") => CHECK_ALL_FIELDS,
        Some(400) if r.mentions("duplicate") => SIMILAR_RULE,
        Some(400) => "Invalid rule data. Please check your information.",
        Some(401) => LOG_IN_AGAIN,
        Some(403) => "You do not have permission to create lending rules.",
        Some(409) => SIMILAR_RULE,
        Some(422) => RULE_DATA_INVALID,
        Some(500) => SERVER_ERROR,
        _ if r.mentions("duplicate") => "A similar lending rule already exists.",
        _ if r.mentions("invalid") => "Invalid rule data provided.",
        _ => return r.or("Failed to create lending rule. Please try again."),
    };
    text.to_string()
}

fn edit_rule(
    r: &Reply<'_>,
    verb: &str,
) -> String {
    let text = match r.status {
        Some(400) if r.mentions("validation") => CHECK_ALL_FIELDS,
        Some(400) if r.mentions("duplicate") => SIMILAR_RULE,
        Some(400) => {
            return format!("Invalid rule data for {verb}. Please check your information.");
        }
        Some(401) => LOG_IN_AGAIN,
        Some(403) => return format!("You do not have permission to {verb} lending rules."),
        Some(404) => "Rule not found. It may have been deleted by another user.",
        Some(409) => SIMILAR_RULE,
        Some(422) => RULE_DATA_INVALID,
        Some(500) => SERVER_ERROR,
        _ if r.mentions("duplicate") => "A similar lending rule already exists.",
        _ if r.mentions("not found") => "Rule not found.",
        _ if r.mentions("permission") => {
            return format!("You do not have permission to {verb} this rule.");
        }
        _ => return r.or(&format!("Failed to {verb} rule. Please try again.")),
    };
    text.to_string()
}

fn apply_to_lenders(r: &Reply<'_>) -> String {
    let text = match r.status {
        Some(400) if r.mentions("already applied") || r.mentions("duplicate") => {
            "You have already applied to one or more of these lenders. Please select different lenders."
        }
        Some(400) if r.mentions("validation") || r.mentions("invalid") => {
            "Invalid application data. Please check your information and try again."
        }
        Some(400) => "Invalid request. Please check your selection and try again.",
        Some(401) => "Authentication failed. Please log in again.",
        Some(403) => "You do not have permission to apply to these lenders.",
        Some(404) => "Selected lenders not found. Please refresh and try again.",
        Some(409) => "You have already applied to one or more of these lenders.",
        Some(422) => "Application data is invalid. Please check your information.",
        Some(500) => SERVER_ERROR,
        _ if r.mentions("already applied") => {
            "You have already applied to one or more of these lenders."
        }
        _ if r.mentions("duplicate") => {
            "Duplicate application detected. You have already applied to some of these lenders."
        }
        _ if r.mentions("not eligible") => {
            "You are not eligible for the selected lenders based on their criteria."
        }
        _ => return r.or("Failed to apply to lenders. Please try again."),
    };
    text.to_string()
}
