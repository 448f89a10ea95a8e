use http::Method;

use super::{Domain, Operation};
use crate::validation::BodyRule;

const PROGRAM: &[&str] = &["program-id"];
const PROGRAM_INSTITUTION: &[&str] = &["program-id", "program-institution-id"];
const PAGING: &[&str] = &["limit", "before-id", "after-id"];
const UTC_RANGE: &[&str] = &["start-utc", "end-utc"];
const EXAMINEE_IDS: &[&str] = &[
    "examinee-id",
    "program-examinee-system-id",
    "program-examinee-public-id",
];
const LONGITUDINAL_GROUP: &[&str] = &["longitudinal-group-id", "longitudinal-group-name"];
const USER_IDS: &[&str] = &["user-id", "program-user-system-id", "program-user-public-id"];
const USER_FILTERS: &[&str] = &["included-user-types", "included-user-statuses"];
const ITEM_WORKSHOP_IMPORT: &[&str] = &["bank-id", "language", "folder-id"];

fn get(name: &'static str, path: &'static str, domain: Domain) -> Operation {
    Operation::new(name, Method::GET, path, domain)
}

fn post(name: &'static str, path: &'static str, domain: Domain) -> Operation {
    Operation::new(name, Method::POST, path, domain).body(BodyRule::Required)
}

fn put(name: &'static str, path: &'static str, domain: Domain) -> Operation {
    Operation::new(name, Method::PUT, path, domain).body(BodyRule::Required)
}

fn patch(name: &'static str, path: &'static str, domain: Domain) -> Operation {
    Operation::new(name, Method::PATCH, path, domain).body(BodyRule::Required)
}

fn delete(name: &'static str, path: &'static str, domain: Domain) -> Operation {
    Operation::new(name, Method::DELETE, path, domain)
}

/// Institution-scoped write with a JSON body.
fn scoped_write(operation: Operation) -> Operation {
    operation
        .required(PROGRAM)
        .optional(&["program-institution-id"])
}

#[allow(clippy::too_many_lines)]
pub(super) fn bundled() -> Vec<Operation> {
    vec![
        // Event class
        get("eventClassQuery", "/event-class/Query", Domain::EventClass)
            .required(PROGRAM_INSTITUTION)
            .optional(&["event-class-id", "event-id", "program-class-code"])
            .also_required("event-id"),
        post("eventClassCreate", "/event-class/Create", Domain::EventClass)
            .required(PROGRAM_INSTITUTION),
        patch("eventClassUpdate", "/event-class/Update", Domain::EventClass)
            .required(PROGRAM_INSTITUTION),
        delete("eventClassDelete", "/event-class/Delete", Domain::EventClass)
            .required(&["program-id", "event-class-id"]),
        post(
            "eventClassExamineesCreate",
            "/event-class/examinees/create",
            Domain::EventClass,
        )
        .required(&["program-id", "program-institution-id", "event-class-id"]),
        get(
            "eventClassExamineesQuery",
            "/event-class/examinees/query",
            Domain::EventClass,
        )
        .required(PROGRAM)
        .optional(&["program-institution-id", "event-class-id"])
        .optional(EXAMINEE_IDS),
        delete(
            "eventClassExamineesDelete",
            "/event-class/examinees/delete",
            Domain::EventClass,
        )
        .required(PROGRAM)
        .optional(&["event-class-examinee-id", "event-class-id"]),
        // Event
        get(
            "eventAuthorizationQuery",
            "/event/authorizations/Query",
            Domain::Authorization,
        )
        .required(PROGRAM)
        .optional(&["program-institution-id", "event-id", "event-description"])
        .optional(PAGING)
        .also_required("program-institution-id")
        .exactly_one(&["event-id", "event-description"]),
        post("eventExamineeImport", "/event/examinee/import", Domain::Event)
            .required(PROGRAM)
            .optional(&["program-institution-id"])
            .required(&["event-id"])
            .body(BodyRule::NonEmptyArray),
        patch(
            "eventExamineeImportUpdate",
            "/event/examinee/import",
            Domain::Event,
        )
        .required(PROGRAM)
        .optional(&["program-institution-id"])
        .required(&["event-id"])
        .body(BodyRule::NonEmptyArray),
        get("eventQuery", "/event/query", Domain::Event)
            .required(PROGRAM)
            .optional(&[
                "program-institution-id",
                "event-id",
                "event-description",
                "active-only",
            ])
            .optional(PAGING),
        delete("eventClose", "/event/close", Domain::Event)
            .required(PROGRAM)
            .optional(&["program-institution-id", "event-id", "event-description"])
            .exactly_one(&["event-id", "event-description"]),
        scoped_write(post("eventCreate", "/event/create", Domain::Event)),
        scoped_write(put("eventUpdate", "/event/update", Domain::Event)),
        // Examinee
        get(
            "queryExamineeEvents",
            "/examinee/events/query",
            Domain::Examinee,
        )
        .required(PROGRAM)
        .optional(&["program-institution-id"])
        .lists(EXAMINEE_IDS)
        .optional(&["IDType"]),
        // Forms
        scoped_write(post(
            "formDefinitionImport",
            "/form/definition/Import",
            Domain::Form,
        )),
        get("formDefinitionQuery", "/form/definition/Query", Domain::Form)
            .required(PROGRAM)
            .optional(&["program-institution-id", "form-id"]),
        get("formQuery", "/Form/Query", Domain::Form)
            .required(PROGRAM)
            .optional(&["program-institution-id"])
            .lists(&["form-id"])
            .optional(&["last-modified-utc"])
            .optional(PAGING)
            .optional(&["include-flag"]),
        scoped_write(post("formCreate", "/Form/Create", Domain::Form)),
        scoped_write(patch("formUpdate", "/Form/Update", Domain::Form)),
        delete("formDelete", "/Form/Delete", Domain::Form)
            .required(PROGRAM)
            .optional(&["program-institution-id"])
            .required_lists(&["form-id"]),
        get("getFormReportsQuery", "/form/reports/Query", Domain::Form)
            .required(&["program-id", "test-id", "form-id"]),
        get("getFormResFilesQuery", "/form/res-files/Query", Domain::Form)
            .required(&["program-id", "form-id"]),
        // Institution
        get(
            "channelInstitutionQuery",
            "/channel/institutions/query",
            Domain::Institution,
        )
        .required(PROGRAM)
        .optional(&["program-institution-id"])
        .optional(PAGING),
        post(
            "channelInstitutionImport",
            "/channel/institutions/import",
            Domain::Institution,
        )
        .required(PROGRAM)
        .optional(&["parent-program-institution-id"]),
        patch(
            "channelInstitutionImportUpdate",
            "/channel/institutions/import",
            Domain::Institution,
        )
        .required(PROGRAM)
        .optional(&["parent-program-institution-id"]),
        // Inventory
        get("inventoryQuery", "/inventory/query", Domain::Inventory)
            .required(PROGRAM_INSTITUTION)
            .lists(&["order-id", "program-order-id", "package-code"])
            .optional(&["start-order-utc", "end-order-utc", "include-flag"]),
        // Item workshop
        get(
            "testExportQuery",
            "/iw-tool/export/tests/query",
            Domain::ItemWorkshop,
        )
        .required(&["bank-id", "form-id"]),
        Operation::new(
            "itemWorkshopImport",
            Method::POST,
            "/iw-tool/import/import",
            Domain::ItemWorkshop,
        )
        .required(ITEM_WORKSHOP_IMPORT),
        Operation::new(
            "itemWorkshopImportAsync",
            Method::POST,
            "/iw-tool/import/import-async",
            Domain::ItemWorkshop,
        )
        .required(ITEM_WORKSHOP_IMPORT)
        .optional(&["callback-url"]),
        get(
            "itemWorkshopQuery",
            "/iw-tool/import/query",
            Domain::ItemWorkshop,
        )
        .required(&["bank-id", "import-id"]),
        // Longitudinal group
        get(
            "getLongitudinalGroupExamineesQuery",
            "/longitudinal-group/examinees/query",
            Domain::Longitudinal,
        )
        .required(PROGRAM)
        .optional(LONGITUDINAL_GROUP)
        .lists(EXAMINEE_IDS)
        .optional(PAGING)
        .exactly_one(LONGITUDINAL_GROUP)
        .exactly_one(EXAMINEE_IDS),
        post(
            "postLongitudinalGroupExamineesCreate",
            "/longitudinal-group/examinees/create",
            Domain::Longitudinal,
        )
        .required(PROGRAM),
        put(
            "putLongitudinalGroupExamineesUpdate",
            "/longitudinal-group/examinees/update",
            Domain::Longitudinal,
        )
        .required(PROGRAM),
        delete(
            "deleteLongitudinalGroupExamineesDelete",
            "/longitudinal-group/examinees/delete",
            Domain::Longitudinal,
        )
        .required(PROGRAM)
        .optional(LONGITUDINAL_GROUP)
        .lists(EXAMINEE_IDS)
        .optional(&["permanent-delete"])
        .exactly_one(LONGITUDINAL_GROUP),
        get(
            "longitudinalSegmentDetailQuery",
            "/examinee/longitudinal-segment-detail/query",
            Domain::Longitudinal,
        )
        .required(PROGRAM)
        .optional(LONGITUDINAL_GROUP)
        .optional(EXAMINEE_IDS)
        .optional(&["include-flag", "result-id"])
        .exactly_one(LONGITUDINAL_GROUP),
        get(
            "longitudinalSegmentsQuery",
            "/examinee/longitudinal-segments/query",
            Domain::Longitudinal,
        )
        .required(PROGRAM)
        .optional(LONGITUDINAL_GROUP)
        .optional(UTC_RANGE)
        .optional(&["cycle-num", "run-num", "segment-num"])
        .optional(EXAMINEE_IDS)
        .exactly_one(LONGITUDINAL_GROUP),
        // Message history
        get(
            "messageHistoryQuery",
            "/message-history/query",
            Domain::MessageHistory,
        )
        .optional(PROGRAM)
        .optional(EXAMINEE_IDS)
        .optional(UTC_RANGE)
        .optional(&["before-id", "after-id", "limit"]),
        // Orders and packages
        get("orderQuery", "/order/Query", Domain::Order)
            .required(PROGRAM)
            .optional(&["program-institution-id"])
            .lists(&["order-id", "order-code", "package-code"])
            .optional(&["ordered-after-utc", "ordered-before-utc"])
            .exclusive("ordered-after-utc", "ordered-before-utc"),
        scoped_write(post("orderCreate", "/order/Create", Domain::Order)),
        scoped_write(delete("orderDelete", "/order/Delete", Domain::Order))
            .body(BodyRule::Required),
        get("packageFormsQuery", "/package/forms/Query", Domain::Order)
            .required(&["program-id", "program-institution-id", "package-code"])
            .optional(&[
                "accessible-only",
                "non-secure-only",
                "practice-only",
                "non-practice-only",
            ]),
        // Pretest
        get(
            "testPretestReferencesQuery",
            "/test/pretest-references/Query",
            Domain::Pretest,
        )
        .required(PROGRAM)
        .lists(&["test-id"]),
        post(
            "testPretestReferencesImport",
            "/test/pretest-references/Import",
            Domain::Pretest,
        )
        .required(&["program-id", "test-id"]),
        // Registration
        scoped_write(post(
            "registrationImportCreate",
            "/registration/import",
            Domain::Registration,
        )),
        scoped_write(put(
            "registrationUpdate",
            "/registration/import",
            Domain::Registration,
        )),
        Operation::new(
            "patchRegistrationUpdate",
            Method::PATCH,
            "/registration/update",
            Domain::Registration,
        )
        .required(PROGRAM)
        .optional(&[
            "program-institution-id",
            "examinee-id",
            "program-examinee-public-id",
            "program-examinee-system-id",
            "program-examinee-institution-id",
            "program-registration-id",
            "registration-id",
        ]),
        get("registrationQuery", "/registration/query", Domain::Registration)
            .required(PROGRAM)
            .optional(&["program-institution-id"])
            .lists(&["registration-id", "program-registration-id"])
            .optional(&[
                "examinee-id",
                "program-examinee-public-id",
                "program-examinee-system-id",
                "program-examinee-institution-id",
            ])
            .optional(UTC_RANGE)
            .optional(&["test-id", "started", "completed", "exclude-flag"])
            .optional(PAGING),
        delete(
            "registrationDelete",
            "/registration/delete",
            Domain::Registration,
        )
        .required(PROGRAM)
        .optional(&["program-institution-id"])
        .lists(&["registration-id", "program-registration-id"])
        .required(&["Reason"])
        .exactly_one(&["registration-id", "program-registration-id"]),
        // Remote
        get(
            "getRemotePracticeChecksQuery",
            "/remote/practice-checks/Query",
            Domain::Remote,
        )
        .required(PROGRAM)
        .optional(&[
            "program-institution-id",
            "ip-address",
            "program-examinee-public-id",
        ])
        .optional(UTC_RANGE)
        .optional(&["program-registration-id"])
        .optional(PAGING),
        get(
            "getRemoteSystemChecksQuery",
            "/remote/system-checks/Query",
            Domain::Remote,
        )
        .required(PROGRAM)
        .lists(&["ip-address"])
        .optional(UTC_RANGE)
        .optional(PAGING),
        scoped_write(post(
            "remoteSessionCreate",
            "/remote/sessions/create",
            Domain::Remote,
        )),
        scoped_write(put(
            "remoteSessionUpdate",
            "/remote/sessions/update",
            Domain::Remote,
        )),
        get("remoteSessionQuery", "/remote/sessions/query", Domain::Remote)
            .required(PROGRAM)
            .optional(&["session-code"])
            .optional(UTC_RANGE)
            .either("session-code", UTC_RANGE),
        delete(
            "remoteSessionDelete",
            "/remote/sessions/delete",
            Domain::Remote,
        )
        .required(PROGRAM)
        .required_lists(&["session-code"]),
        get(
            "remoteAdminUrlsQuery",
            "/remote/admin-urls/Query",
            Domain::Remote,
        )
        .required(PROGRAM)
        .optional(&["session-code"])
        .optional(UTC_RANGE)
        .optional(&["url-type"])
        .either("session-code", UTC_RANGE)
        .required_when("session-code", "url-type", "1"),
        // Results and sabbatical
        get("resultIdentifierQuery", "/result-identifier/Query", Domain::Result)
            .required(PROGRAM)
            .lists(&[
                "program-institution-id",
                "examinee-id",
                "program-examinee-system-id",
                "program-examinee-public-id",
                "program-registration-id",
                "program-center-id",
                "cohort-id",
                "event-id",
                "test-id",
                "form-id",
                "longitudinal-group-id",
            ])
            .optional(UTC_RANGE)
            .optional(&["completed-only", "equated-only", "include-demo"])
            .optional(PAGING),
        get("sabbaticalQuery", "/sabbatical/Query", Domain::Sabbatical)
            .required(PROGRAM)
            .optional(EXAMINEE_IDS)
            .optional(&["examinee-sabbatical-id"])
            .optional(UTC_RANGE),
        // Secure browser
        get(
            "secureBrowserErrorsQuery",
            "/secure-browser/errors/query",
            Domain::SecureBrowser,
        )
        .required(&["program-id", "environment-id"])
        .optional(&["program-institution-id", "external-registration-id"])
        .optional(UTC_RANGE)
        .optional(&["limit", "before-id", "end-id"]),
        post(
            "secureBrowserTokensValidate",
            "/secure-browser/tokens/validate",
            Domain::SecureBrowser,
        )
        .required(PROGRAM),
        // Session
        get("sessionQuery", "/session/query", Domain::Session)
            .required(PROGRAM)
            .optional(&["program-institution-id", "session-code"])
            .optional(UTC_RANGE)
            .either("session-code", UTC_RANGE),
        scoped_write(post("sessionCreate", "/session/create", Domain::Session)),
        scoped_write(patch("sessionUpdate", "/session/update", Domain::Session)),
        delete("sessionDelete", "/session/delete", Domain::Session)
            .required(&["program-id", "session-code"]),
        // Platform
        get("signalRDomainQuery", "/signalr-domain/query", Domain::Platform),
        get("getTimezoneQuery", "/Timezone/Query", Domain::Platform),
        // Start test
        post("startTestLogin", "/start-test/Login", Domain::StartTest)
            .optional(PROGRAM_INSTITUTION),
        post("startTestStart", "/start-test/Start", Domain::StartTest)
            .optional(PROGRAM_INSTITUTION),
        // Test
        get("testFormsQuery", "/test/forms/Query", Domain::Test)
            .required(PROGRAM)
            .optional(&["program-institution-id"])
            .lists(&["test-name", "test-id"])
            .optional(UTC_RANGE),
        // Users
        get("queryUserAccess", "/user/access/query", Domain::User)
            .optional(&["vendor-id", "sponsor-id"])
            .lists(&["program-id", "program-institution-id"])
            .lists(USER_IDS)
            .optional(USER_FILTERS)
            .exactly_one(&["vendor-id", "sponsor-id"]),
        delete("deleteUserAccess", "/user/access/delete", Domain::User)
            .optional(&["vendor-id", "sponsor-id"])
            .lists(&["program-id", "program-institution-id"])
            .lists(USER_IDS)
            .exactly_one(&["vendor-id", "sponsor-id"])
            .exactly_one(&["program-id", "program-institution-id"]),
        get("getUserQuery", "/User/query", Domain::User)
            .optional(&["vendor-id", "sponsor-id"])
            .lists(USER_IDS)
            .optional(USER_FILTERS)
            .exactly_one(&["vendor-id", "sponsor-id"]),
        delete("deleteUserDelete", "/User/delete", Domain::User)
            .required(&["vendor-id"])
            .optional(&["program-institution-id"])
            .lists(USER_IDS),
    ]
}
