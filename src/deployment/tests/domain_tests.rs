//! Unit tests for deployment domain types.

use super::support::{PICARD, fields, record};
use crate::deployment::domain::{
    ActiveBasis, ActiveSignal, Author, DeploymentDomainError, DeploymentHistory, DeploymentId,
    DeploymentRecord, DeploymentSource, RecordField, RollbackAttempt, RollbackPhase, ServiceName,
    resolve_active,
};
use proptest::prelude::*;
use rstest::{fixture, rstest};

#[fixture]
fn service() -> ServiceName {
    ServiceName::new("enterprise").expect("valid service name")
}

// ── Identifiers ────────────────────────────────────────────────────

#[rstest]
fn service_name_is_trimmed() {
    let name = ServiceName::new("  enterprise  ").expect("should accept after trim");
    assert_eq!(name.as_str(), "enterprise");
}

#[rstest]
#[case("")]
#[case("   ")]
fn empty_service_name_is_rejected(#[case] input: &str) {
    assert_eq!(
        ServiceName::new(input),
        Err(DeploymentDomainError::EmptyServiceName)
    );
}

#[rstest]
fn service_name_with_inner_whitespace_is_rejected() {
    assert!(matches!(
        ServiceName::new("star ship"),
        Err(DeploymentDomainError::InvalidServiceName(_))
    ));
}

#[rstest]
#[case("")]
#[case(" \t")]
fn blank_deployment_id_is_rejected(#[case] input: &str) {
    assert_eq!(
        DeploymentId::new(input),
        Err(DeploymentDomainError::EmptyDeploymentId)
    );
}

#[rstest]
fn blank_author_is_not_an_identity() {
    assert!(Author::parse("  ").is_none());
    assert!(Author::unattributed().is_unattributed());
    assert!(
        !Author::parse(PICARD)
            .expect("author should parse")
            .is_unattributed()
    );
}

// ── Sources ────────────────────────────────────────────────────────

#[rstest]
#[case("wrangler", DeploymentSource::Wrangler, "🤠 Wrangler")]
#[case("api", DeploymentSource::Api, "📡 API")]
#[case("dash", DeploymentSource::Dashboard, "🖥️ Dashboard")]
#[case("terraform", DeploymentSource::Terraform, "🏗️ Terraform")]
#[case("spaceport_alpha", DeploymentSource::Other("spaceport_alpha".to_owned()), "Other")]
fn sources_parse_and_label(
    #[case] raw: &str,
    #[case] expected: DeploymentSource,
    #[case] label: &str,
) {
    let source = DeploymentSource::from(raw);
    assert_eq!(source, expected);
    assert_eq!(source.label(), label);
    assert_eq!(source.as_str(), raw);
}

// ── Records ────────────────────────────────────────────────────────

#[rstest]
fn record_requires_author() {
    let mut payload = fields("Galaxy-Class", 1, "2021-01-01T00:00:00.000000Z");
    payload.author = None;

    let err = DeploymentRecord::new(payload).expect_err("record should be rejected");

    assert_eq!(err.field, RecordField::Author);
    assert!(err.to_string().contains("author_email"));
}

#[rstest]
fn record_rejects_unparseable_timestamp() {
    let payload = fields("Galaxy-Class", 1, "stardate 41153.7");

    let err = DeploymentRecord::new(payload).expect_err("record should be rejected");

    assert_eq!(err.field, RecordField::CreatedAt);
}

#[rstest]
fn record_rejects_negative_ordinal() {
    let mut payload = fields("Galaxy-Class", 1, "2021-01-01T00:00:00.000000Z");
    payload.number = Some("-1".to_owned());

    let err = DeploymentRecord::new(payload).expect_err("record should be rejected");

    assert_eq!(err.field, RecordField::Number);
}

#[rstest]
fn record_without_source_is_malformed() {
    let mut payload = fields("Galaxy-Class", 1, "2021-01-01T00:00:00.000000Z");
    payload.source = None;

    let err = DeploymentRecord::new(payload).expect_err("record should be rejected");

    assert_eq!(err.field, RecordField::Source);
}

// ── History ────────────────────────────────────────────────────────

#[rstest]
fn history_sorts_pages_and_drops_duplicates(service: ServiceName) {
    let later_page = vec![
        record("Intrepid-Class", 2, "2021-02-02T00:00:00.000000Z"),
        record("Sovereign-Class", 3, "2021-02-03T00:00:00.000000Z"),
    ];
    let earlier_page = vec![
        record("Galaxy-Class", 1, "2021-01-01T00:00:00.000000Z"),
        record("Intrepid-Class", 2, "2030-01-01T00:00:00.000000Z"),
    ];

    let history = DeploymentHistory::from_pages(service, [later_page, earlier_page])
        .expect("history should build");

    let ids = history
        .records()
        .iter()
        .map(|found| found.id().as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, ["Galaxy-Class", "Intrepid-Class", "Sovereign-Class"]);
    let kept = history
        .get(&DeploymentId::new("Intrepid-Class").expect("valid id"))
        .expect("duplicate should keep first occurrence");
    assert_eq!(
        kept.created_at().to_rfc3339(),
        "2021-02-02T00:00:00+00:00"
    );
}

#[rstest]
fn equal_ordinals_are_ordered_by_creation_time(service: ServiceName) {
    let page = vec![
        record("later", 4, "2021-01-02T00:00:00.000000Z"),
        record("earlier", 4, "2021-01-01T00:00:00.000000Z"),
    ];

    let history = DeploymentHistory::from_pages(service, [page]).expect("history should build");

    assert_eq!(
        history.latest().map(|latest| latest.id().as_str()),
        Some("later")
    );
}

#[rstest]
fn listed_record_without_ordinal_is_malformed(service: ServiceName) {
    let mut payload = fields("Galaxy-Class", 1, "2021-01-01T00:00:00.000000Z");
    payload.number = None;
    let unnumbered = DeploymentRecord::new(payload).expect("record itself is valid");

    let err = DeploymentHistory::from_pages(service, [vec![unnumbered]])
        .expect_err("history should be rejected");

    assert_eq!(err.field, RecordField::Number);
}

#[rstest]
fn recent_returns_the_newest_window(service: ServiceName) {
    let page = (1..=12)
        .map(|number| {
            record(
                &format!("deployment-{number}"),
                number,
                "2021-01-01T00:00:00.000000Z",
            )
        })
        .collect::<Vec<_>>();
    let history = DeploymentHistory::from_pages(service, [page]).expect("history should build");

    let window = history.recent(10);

    assert_eq!(window.len(), 10);
    assert_eq!(
        window.first().map(|first| first.id().as_str()),
        Some("deployment-3")
    );
    assert_eq!(history.recent(50).len(), 12);
}

// ── Active resolution ──────────────────────────────────────────────

#[rstest]
fn reported_signal_selects_named_deployment(service: ServiceName) {
    let history = DeploymentHistory::from_pages(
        service,
        [vec![
            record("Galaxy-Class", 1, "2021-01-01T00:00:00.000000Z"),
            record("Intrepid-Class", 2, "2021-02-02T00:00:00.000000Z"),
        ]],
    )
    .expect("history should build");
    let signal = ActiveSignal::Reported(DeploymentId::new("Galaxy-Class").expect("valid id"));

    let active = resolve_active(&history, &signal).expect("history is not empty");

    assert_eq!(active.record.id().as_str(), "Galaxy-Class");
    assert_eq!(active.basis, ActiveBasis::Reported);
}

#[rstest]
#[case(ActiveSignal::Unavailable)]
#[case(ActiveSignal::Reported(DeploymentId::new("Defiant-Class").expect("valid id")))]
fn unusable_signal_falls_back_to_highest_ordinal(
    service: ServiceName,
    #[case] signal: ActiveSignal,
) {
    let history = DeploymentHistory::from_pages(
        service,
        [vec![
            record("Intrepid-Class", 2, "2021-02-02T00:00:00.000000Z"),
            record("Galaxy-Class", 1, "2021-01-01T00:00:00.000000Z"),
        ]],
    )
    .expect("history should build");

    let active = resolve_active(&history, &signal).expect("history is not empty");

    assert_eq!(active.record.id().as_str(), "Intrepid-Class");
    assert_eq!(active.basis, ActiveBasis::LatestByNumber);
}

#[rstest]
fn empty_history_has_no_active_deployment(service: ServiceName) {
    let history = DeploymentHistory::empty(service.clone());

    let result = resolve_active(&history, &ActiveSignal::Unavailable);

    assert!(history.is_empty());
    assert_eq!(
        result.err(),
        Some(DeploymentDomainError::NoActiveDeployment(service))
    );
}

proptest! {
    #[test]
    fn highest_ordinal_is_active_without_signal(
        numbers in proptest::collection::hash_set(0_u64..10_000, 1..40)
    ) {
        let service = ServiceName::new("enterprise").expect("valid service name");
        let expected = numbers.iter().max().copied().expect("non-empty set");
        let page = numbers
            .iter()
            .map(|number| record(&format!("deployment-{number}"), *number, "2021-01-01T00:00:00Z"))
            .collect::<Vec<_>>();
        let history = DeploymentHistory::from_pages(service, [page]).expect("history should build");

        let active = resolve_active(&history, &ActiveSignal::Unavailable)
            .expect("history is not empty");

        prop_assert_eq!(active.record.number().map(|number| number.value()), Some(expected));
        let ascending = history.records().windows(2).all(|pair| match pair {
            [left, right] => left.number() <= right.number(),
            _ => false,
        });
        prop_assert!(ascending, "history should be sorted by number");
    }
}

// ── Rollback phases ────────────────────────────────────────────────

#[rstest]
fn rollback_attempt_follows_happy_path(service: ServiceName) {
    let mut attempt = RollbackAttempt::requested(service, "Galaxy-Class");

    for phase in [
        RollbackPhase::Validated,
        RollbackPhase::Submitted,
        RollbackPhase::Confirmed,
    ] {
        attempt.advance(phase).expect("transition should be allowed");
    }

    assert_eq!(attempt.phase(), RollbackPhase::Confirmed);
    assert!(attempt.phase().is_terminal());
    assert_eq!(attempt.trail().len(), 4);
}

#[rstest]
#[case(RollbackPhase::Submitted)]
#[case(RollbackPhase::Confirmed)]
#[case(RollbackPhase::Failed)]
fn rollback_attempt_cannot_skip_validation(service: ServiceName, #[case] next: RollbackPhase) {
    let mut attempt = RollbackAttempt::requested(service, "Galaxy-Class");

    let result = attempt.advance(next);

    assert!(matches!(
        result,
        Err(DeploymentDomainError::InvalidRollbackTransition { .. })
    ));
    assert_eq!(attempt.phase(), RollbackPhase::Requested);
}

#[rstest]
fn terminal_phase_accepts_no_further_transition(service: ServiceName) {
    let mut attempt = RollbackAttempt::requested(service, "");
    attempt
        .advance(RollbackPhase::Rejected)
        .expect("requested can be rejected");

    assert!(attempt.advance(RollbackPhase::Validated).is_err());
    assert_eq!(
        attempt.trail(),
        [RollbackPhase::Requested, RollbackPhase::Rejected]
    );
}
