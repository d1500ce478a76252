use chrono::{DateTime, Utc};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{Condition, Time};

pub const STATUS_TRUE: &str = "True";
pub const STATUS_FALSE: &str = "False";

pub fn condition(
    type_: &str,
    status: bool,
    reason: &str,
    message: &str,
    observed_generation: Option<i64>,
    now: DateTime<Utc>,
) -> Condition {
    Condition {
        type_: type_.to_string(),
        status: if status { STATUS_TRUE } else { STATUS_FALSE }.to_string(),
        reason: reason.to_string(),
        message: message.to_string(),
        observed_generation,
        last_transition_time: Time(now),
    }
}

/// Folds a candidate condition into an existing condition list.
///
/// The list behaves as an ordered map keyed by condition type: a
/// same-type entry is overwritten only when its status, reason, message,
/// or observed generation differs from the candidate's. A candidate that
/// differs only in its transition timestamp leaves the list untouched,
/// so repeated identical reconciliations do not churn statuses. Unknown
/// types are appended.
pub fn reconcile(conditions: &mut Vec<Condition>, candidate: Condition) {
    match conditions.iter_mut().find(|c| c.type_ == candidate.type_) {
        Some(existing) => {
            if existing.status != candidate.status
                || existing.reason != candidate.reason
                || existing.message != candidate.message
                || existing.observed_generation != candidate.observed_generation
            {
                *existing = candidate;
            }
        }
        None => conditions.push(candidate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn appends_new_type() {
        let mut conditions = vec![condition("Ready", true, "Ok", "ok", Some(1), at(0))];
        reconcile(
            &mut conditions,
            condition("Scheduled", true, "Ok", "ok", Some(1), at(0)),
        );
        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions[1].type_, "Scheduled");
    }

    #[test]
    fn identical_condition_keeps_original_timestamp() {
        let original = condition("Ready", true, "Ok", "ok", Some(1), at(0));
        let mut conditions = vec![original.clone()];
        reconcile(
            &mut conditions,
            condition("Ready", true, "Ok", "ok", Some(1), at(100)),
        );
        assert_eq!(conditions, vec![original]);
    }

    #[test]
    fn identical_condition_keeps_position_and_does_not_duplicate() {
        let mut conditions = vec![
            condition("Ready", true, "Ok", "ok", Some(1), at(0)),
            condition("Scheduled", true, "Ok", "ok", Some(1), at(0)),
        ];
        reconcile(
            &mut conditions,
            condition("Ready", true, "Ok", "ok", Some(1), at(50)),
        );
        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions[0].type_, "Ready");
        assert_eq!(conditions[0].last_transition_time, Time(at(0)));
    }

    #[test]
    fn changed_status_overwrites_in_place() {
        let mut conditions = vec![
            condition("Ready", true, "Ok", "ok", Some(1), at(0)),
            condition("Scheduled", true, "Ok", "ok", Some(1), at(0)),
        ];
        reconcile(
            &mut conditions,
            condition("Ready", false, "ListenerInvalid", "bad listener", Some(1), at(50)),
        );
        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions[0].status, STATUS_FALSE);
        assert_eq!(conditions[0].last_transition_time, Time(at(50)));
    }

    #[test]
    fn changed_generation_overwrites() {
        let mut conditions = vec![condition("Ready", true, "Ok", "ok", Some(1), at(0))];
        reconcile(
            &mut conditions,
            condition("Ready", true, "Ok", "ok", Some(2), at(50)),
        );
        assert_eq!(conditions[0].observed_generation, Some(2));
        assert_eq!(conditions[0].last_transition_time, Time(at(50)));
    }
}
