//! The bundled catalogue of ITS API operations.
//!
//! Each [`Operation`] pairs an HTTP method and a path (casing preserved
//! exactly, `/Form/Query` and `/form/definition/Query` are different
//! endpoints) with its declared query parameters and the [`ParameterRule`]
//! the validator enforces.

use std::fmt;
use std::sync::LazyLock;

use http::Method;
use indexmap::IndexMap;

use crate::validation::{Alternative, BodyRule, ParameterRule, ValueCondition};

mod openapi;
mod operations;

static BUNDLED: LazyLock<Catalog> = LazyLock::new(|| Catalog::new(operations::bundled()));

/// Business area an operation belongs to, used as OpenAPI tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Domain {
    /// Event authorizations.
    Authorization,
    /// Test events.
    Event,
    /// Class sessions of an event.
    EventClass,
    /// Examinee events.
    Examinee,
    /// Forms and form definitions.
    Form,
    /// Channel institutions.
    Institution,
    /// Package inventory.
    Inventory,
    /// Item workshop imports and exports.
    ItemWorkshop,
    /// Longitudinal groups and segments.
    Longitudinal,
    /// Message history.
    MessageHistory,
    /// Orders and package forms.
    Order,
    /// Time zones and SignalR domain.
    Platform,
    /// Pretest references.
    Pretest,
    /// Registrations.
    Registration,
    /// Remote sessions and checks.
    Remote,
    /// Result identifiers.
    Result,
    /// Sabbaticals.
    Sabbatical,
    /// Secure browser tokens and errors.
    SecureBrowser,
    /// Sessions.
    Session,
    /// Test login and start.
    StartTest,
    /// Test forms.
    Test,
    /// Users and user access.
    User,
}

impl Domain {
    /// Display name, e.g. `Event Class`.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Authorization => "Authorization",
            Self::Event => "Event",
            Self::EventClass => "Event Class",
            Self::Examinee => "Examinee",
            Self::Form => "Form",
            Self::Institution => "Institution",
            Self::Inventory => "Inventory",
            Self::ItemWorkshop => "Item Workshop",
            Self::Longitudinal => "Longitudinal Group",
            Self::MessageHistory => "Message History",
            Self::Order => "Order",
            Self::Platform => "Platform",
            Self::Pretest => "Pretest",
            Self::Registration => "Registration",
            Self::Remote => "Remote",
            Self::Result => "Result",
            Self::Sabbatical => "Sabbatical",
            Self::SecureBrowser => "Secure Browser",
            Self::Session => "Session",
            Self::StartTest => "Start Test",
            Self::Test => "Test",
            Self::User => "User",
        }
    }

    /// What the records of this domain represent.
    pub fn description(self) -> &'static str {
        match self {
            Self::Authorization => {
                "Authorization records control which examinees can access specific tests and events."
            }
            Self::Event => {
                "Test events are scheduled test administrations available to examinees."
            }
            Self::EventClass => {
                "Class sessions are scheduled test sessions with time slots, capacity limits and enrollment details."
            }
            Self::Examinee => "Examinees and the test events they take part in.",
            Self::Form => "Test forms and assessment definitions delivered to examinees.",
            Self::Institution => {
                "Educational institutions are schools and organizations that administer tests through the platform."
            }
            Self::Inventory => "Ordered test packages and their remaining inventory.",
            Self::ItemWorkshop => "Item bank imports and test exports of the item workshop tool.",
            Self::Longitudinal => {
                "Longitudinal groups follow examinees across cycles, runs and segments."
            }
            Self::MessageHistory => "Messages sent to examinees by the platform.",
            Self::Order => "Orders of test packages and the forms they grant access to.",
            Self::Platform => "Platform utilities such as time zones and the SignalR domain.",
            Self::Pretest => "Pretest references attached to tests.",
            Self::Registration => "Registrations enroll examinees into tests.",
            Self::Remote => "Remote proctoring sessions, admin URLs and examinee system checks.",
            Self::Result => "Result identifiers of completed and equated tests.",
            Self::Sabbatical => "Sabbatical periods during which examinees are not tested.",
            Self::SecureBrowser => "Secure browser launch tokens and reported errors.",
            Self::Session => "Test sessions scheduled at institutions.",
            Self::StartTest => "Examinee login and test start for delivery.",
            Self::Test => "Tests and the forms they are delivered with.",
            Self::User => "Users and their access to programs and institutions.",
        }
    }

    /// Plural noun for counted records, e.g. `Found 12 events`.
    pub fn noun(self) -> &'static str {
        match self {
            Self::Authorization => "authorization records",
            Self::Event => "events",
            Self::EventClass => "class sessions",
            Self::Examinee => "examinee records",
            Self::Form => "forms",
            Self::Institution => "institutions",
            Self::Inventory => "inventory records",
            Self::ItemWorkshop => "item workshop records",
            Self::Longitudinal => "longitudinal records",
            Self::MessageHistory => "messages",
            Self::Order => "orders",
            Self::Platform | Self::StartTest => "records",
            Self::Pretest => "pretest references",
            Self::Registration => "registrations",
            Self::Remote => "remote records",
            Self::Result => "results",
            Self::Sabbatical => "sabbaticals",
            Self::SecureBrowser => "secure browser records",
            Self::Session => "sessions",
            Self::Test => "test forms",
            Self::User => "users",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A query parameter declared by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    /// Parameter name, e.g. `program-id`.
    pub name: &'static str,
    /// Part of the required set of the rule.
    pub required: bool,
    /// Accepts several values, sent as repeated keys.
    pub list: bool,
}

/// A catalogue entry.
#[derive(Debug, Clone)]
pub struct Operation {
    name: &'static str,
    method: Method,
    path: &'static str,
    domain: Domain,
    params: Vec<ParamSpec>,
    rule: ParameterRule,
}

impl Operation {
    pub(crate) fn new(
        name: &'static str,
        method: Method,
        path: &'static str,
        domain: Domain,
    ) -> Self {
        Self {
            name,
            method,
            path,
            domain,
            params: vec![],
            rule: ParameterRule::default(),
        }
    }

    /// Operation name, e.g. `eventQuery`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path relative to the base URL.
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Business area.
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Declared query parameters, in documentation order.
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Validation rule.
    pub fn rule(&self) -> &ParameterRule {
        &self.rule
    }

    /// `METHOD path`, as used in error messages.
    pub fn endpoint(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    /// Returns the declared parameter with this name.
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|param| param.name == name)
    }

    /// Returns `true` when the operation declares this query parameter.
    pub fn declares(&self, name: &str) -> bool {
        self.param(name).is_some()
    }

    fn declare(mut self, names: &[&'static str], required: bool, list: bool) -> Self {
        for name in names {
            self.params.push(ParamSpec {
                name,
                required,
                list,
            });
            if required {
                self.rule.required.push(name);
            }
        }
        self
    }

    #[must_use]
    pub(crate) fn required(self, names: &[&'static str]) -> Self {
        self.declare(names, true, false)
    }

    #[must_use]
    pub(crate) fn required_lists(self, names: &[&'static str]) -> Self {
        self.declare(names, true, true)
    }

    #[must_use]
    pub(crate) fn optional(self, names: &[&'static str]) -> Self {
        self.declare(names, false, false)
    }

    #[must_use]
    pub(crate) fn lists(self, names: &[&'static str]) -> Self {
        self.declare(names, false, true)
    }

    /// Makes an already declared optional parameter required.
    #[must_use]
    pub(crate) fn also_required(mut self, name: &'static str) -> Self {
        if let Some(param) = self.params.iter_mut().find(|param| param.name == name) {
            param.required = true;
        }
        if !self.rule.required.contains(&name) {
            self.rule.required.push(name);
        }
        self
    }

    #[must_use]
    pub(crate) fn exactly_one(mut self, names: &[&'static str]) -> Self {
        self.rule.conditional_groups.push(names.to_vec());
        self
    }

    #[must_use]
    pub(crate) fn either(mut self, single: &'static str, all_of: &[&'static str]) -> Self {
        self.rule.alternatives.push(Alternative {
            single,
            all_of: all_of.to_vec(),
        });
        self
    }

    #[must_use]
    pub(crate) fn exclusive(mut self, first: &'static str, second: &'static str) -> Self {
        self.rule.mutually_exclusive.push((first, second));
        self
    }

    #[must_use]
    pub(crate) fn required_when(
        mut self,
        parameter: &'static str,
        when: &'static str,
        equals: &'static str,
    ) -> Self {
        self.rule.required_when.push(ValueCondition {
            parameter,
            when,
            equals,
        });
        self
    }

    #[must_use]
    pub(crate) fn body(mut self, body: BodyRule) -> Self {
        self.rule.body = body;
        self
    }

    /// Adds the rules shared by every operation declaring the same parameters:
    /// cursor pagination is exclusive and UTC ranges need both bounds.
    fn with_common_rules(mut self) -> Self {
        if self.declares("before-id") && self.declares("after-id") {
            self.rule.mutually_exclusive.push(("before-id", "after-id"));
        }
        let ranged_alternative = self
            .rule
            .alternatives
            .iter()
            .any(|alternative| alternative.all_of.contains(&"start-utc"));
        if self.declares("start-utc") && self.declares("end-utc") && !ranged_alternative {
            self.rule.co_required.push(("start-utc", "end-utc"));
        }
        self
    }
}

/// Lookup tables over the bundled operations.
#[derive(Debug, Clone)]
pub struct Catalog {
    operations: IndexMap<&'static str, Operation>,
}

impl Catalog {
    fn new(operations: Vec<Operation>) -> Self {
        let operations = operations
            .into_iter()
            .map(|operation| (operation.name, operation.with_common_rules()))
            .collect();
        Self { operations }
    }

    /// The catalogue shipped with the crate.
    pub fn bundled() -> &'static Self {
        &BUNDLED
    }

    /// Looks an operation up by name, e.g. `eventQuery`.
    pub fn get(&self, name: &str) -> Option<&Operation> {
        self.operations.get(name)
    }

    /// Looks an operation up by exact method and path.
    pub fn find(&self, method: &Method, path: &str) -> Option<&Operation> {
        self.operations
            .values()
            .find(|operation| operation.method == *method && operation.path == path)
    }

    /// Iterates over the operations in declaration order.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.values()
    }

    /// Operations of one domain, in declaration order.
    pub fn by_domain(&self, domain: Domain) -> impl Iterator<Item = &Operation> {
        self.operations
            .values()
            .filter(move |operation| operation.domain == domain)
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns `true` when there is no operation.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
