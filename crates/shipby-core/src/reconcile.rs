//! Ship-by reconciliation.
//!
//! Compares the delivery date a customer wrote into the sale note with the
//! invoice ship-by date and decides what, if anything, to write back. When
//! the delivery date is unusable or earlier than the ship-by date, the
//! ship-by moves to the following calendar day and the note is rewritten to
//! match.
//!
//! Every decision is a pure function of the snapshot, and applying an
//! [`Decision::Update`] then reconciling again always yields
//! [`Decision::NoOp`]. Overlapping or repeated runs are therefore harmless.

use chrono::{DateTime, SubsecRound, Utc};

use crate::directive::{self, midnight_utc};
use crate::error::{Result, ShipByError};
use crate::types::{Decision, OrderSnapshot, StagingReason};

/// UTC, truncated to whole seconds.
pub fn normalize(date: DateTime<Utc>) -> DateTime<Utc> {
    date.trunc_subsecs(0)
}

/// Midnight UTC on the calendar day after `ship_by`.
pub fn staged_ship_by(ship_by: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let next = ship_by
        .date_naive()
        .succ_opt()
        .ok_or(ShipByError::DateOverflow)?;
    midnight_utc(next).ok_or(ShipByError::DateOverflow)
}

/// Decide whether the sale needs its ship-by date and note rewritten.
///
/// Fails with [`ShipByError::MissingShipBy`] when the staging buffer is
/// needed but there is no ship-by date to add it to.
pub fn reconcile(snapshot: &OrderSnapshot) -> Result<Decision> {
    let current = snapshot.ship_by.map(normalize);
    let delivery = snapshot.delivery_date.map(normalize);

    let (ship_by, note, staged) = match (snapshot.note.as_deref(), delivery) {
        (Some(note), Some(delivery)) if !current.is_some_and(|s| delivery < s) => {
            (delivery, note.to_string(), None)
        }
        (note, delivery) => {
            let reason = match (note, delivery) {
                (None, _) => StagingReason::MissingNote,
                (Some(_), None) => StagingReason::MissingDirective,
                (Some(_), Some(_)) => StagingReason::DeliveryBeforeShipBy,
            };
            let ship_by = snapshot.ship_by.ok_or(ShipByError::MissingShipBy)?;
            let staged = staged_ship_by(ship_by)?;
            let line = directive::directive_line(staged);
            let note = match (note, reason) {
                (Some(note), StagingReason::DeliveryBeforeShipBy) => {
                    directive::replace_directives(note, &line)
                }
                (Some(note), _) => directive::prepend_directive(note, &line),
                (None, _) => format!("{line}\n"),
            };
            (staged, note, Some(reason))
        }
    };

    let ship_by = normalize(ship_by);
    if current == Some(ship_by) {
        return Ok(Decision::NoOp);
    }

    Ok(Decision::Update {
        ship_by,
        note,
        staged,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn snapshot(note: Option<&str>, ship_by: Option<DateTime<Utc>>) -> OrderSnapshot {
        OrderSnapshot::new(note.map(str::to_string), ship_by)
    }

    /// Apply an update and reconcile again.
    fn rerun(decision: &Decision) -> Decision {
        let Decision::Update { ship_by, note, .. } = decision else {
            panic!("expected Update, got {decision:?}")
        };
        reconcile(&snapshot(Some(note.as_str()), Some(*ship_by))).unwrap()
    }

    #[test]
    fn delivery_before_ship_by_is_staged() {
        let snap = snapshot(
            Some("Delivery-Date: 2024/10/09\nRing the bell"),
            Some(utc(2024, 10, 10)),
        );
        let decision = reconcile(&snap).unwrap();
        assert_eq!(
            decision,
            Decision::Update {
                ship_by: utc(2024, 10, 11),
                note: "Delivery-Date: 10/11/2024\nRing the bell".into(),
                staged: Some(StagingReason::DeliveryBeforeShipBy),
            }
        );
        assert_eq!(rerun(&decision), Decision::NoOp);
    }

    #[test]
    fn staging_rewrites_date_from_the_line_below_directive() {
        let snap = snapshot(
            Some("Delivery-Date:\n2024/10/09\nback door"),
            Some(utc(2024, 10, 10)),
        );
        let decision = reconcile(&snap).unwrap();
        assert_eq!(
            decision,
            Decision::Update {
                ship_by: utc(2024, 10, 11),
                note: "Delivery-Date: 10/11/2024\nback door".into(),
                staged: Some(StagingReason::DeliveryBeforeShipBy),
            }
        );
        assert_eq!(rerun(&decision), Decision::NoOp);
    }

    #[test]
    fn equal_dates_are_a_noop() {
        let snap = snapshot(
            Some("Delivery-Date:   2024/10/10  \n"),
            Some(utc(2024, 10, 10)),
        );
        assert_eq!(reconcile(&snap).unwrap(), Decision::NoOp);
    }

    #[test]
    fn sub_second_differences_are_ignored() {
        let ship_by = utc(2024, 10, 10) + Duration::milliseconds(750);
        let snap = snapshot(Some("Delivery-Date: 2024/10/10"), Some(ship_by));
        assert_eq!(reconcile(&snap).unwrap(), Decision::NoOp);
    }

    #[test]
    fn later_delivery_date_moves_ship_by_without_touching_note() {
        let note = "Delivery-Date: 2024/10/15\nside door";
        let snap = snapshot(Some(note), Some(utc(2024, 10, 10)));
        let decision = reconcile(&snap).unwrap();
        assert_eq!(
            decision,
            Decision::Update {
                ship_by: utc(2024, 10, 15),
                note: note.into(),
                staged: None,
            }
        );
        assert_eq!(rerun(&decision), Decision::NoOp);
    }

    #[test]
    fn missing_note_creates_directive() {
        let snap = snapshot(None, Some(utc(2024, 10, 10)));
        let decision = reconcile(&snap).unwrap();
        assert_eq!(
            decision,
            Decision::Update {
                ship_by: utc(2024, 10, 11),
                note: "Delivery-Date: 10/11/2024\n".into(),
                staged: Some(StagingReason::MissingNote),
            }
        );
        assert_eq!(rerun(&decision), Decision::NoOp);
    }

    #[test]
    fn empty_note_is_treated_like_missing() {
        let snap = snapshot(Some(""), Some(utc(2024, 10, 10)));
        let Decision::Update { note, staged, .. } = reconcile(&snap).unwrap() else {
            panic!("expected Update")
        };
        assert_eq!(note, "Delivery-Date: 10/11/2024\n");
        assert_eq!(staged, Some(StagingReason::MissingNote));
    }

    #[test]
    fn note_without_directive_gets_one_prepended() {
        let snap = snapshot(Some("hello world"), Some(utc(2024, 1, 1)));
        let decision = reconcile(&snap).unwrap();
        assert_eq!(
            decision,
            Decision::Update {
                ship_by: utc(2024, 1, 2),
                note: "Delivery-Date: 01/02/2024\nhello world".into(),
                staged: Some(StagingReason::MissingDirective),
            }
        );
        assert_eq!(rerun(&decision), Decision::NoOp);
    }

    #[test]
    fn malformed_directive_is_left_behind_a_new_one() {
        let snap = snapshot(Some("Delivery-Date: 10-11-2024"), Some(utc(2024, 10, 10)));
        let decision = reconcile(&snap).unwrap();
        let Decision::Update { note, .. } = &decision else {
            panic!("expected Update")
        };
        assert_eq!(note, "Delivery-Date: 10/11/2024\nDelivery-Date: 10-11-2024");
        assert_eq!(rerun(&decision), Decision::NoOp);
    }

    #[test]
    fn staging_drops_ship_by_time_of_day() {
        let ship_by = Utc.with_ymd_and_hms(2024, 10, 10, 18, 45, 12).unwrap();
        let snap = snapshot(Some("Delivery-Date: 2024/10/10"), Some(ship_by));
        let decision = reconcile(&snap).unwrap();
        let Decision::Update { ship_by, staged, .. } = &decision else {
            panic!("expected Update")
        };
        assert_eq!(*ship_by, utc(2024, 10, 11));
        assert_eq!(*staged, Some(StagingReason::DeliveryBeforeShipBy));
        assert_eq!(rerun(&decision), Decision::NoOp);
    }

    #[test]
    fn staging_crosses_month_and_year_boundaries() {
        assert_eq!(staged_ship_by(utc(2024, 2, 29)).unwrap(), utc(2024, 3, 1));
        assert_eq!(staged_ship_by(utc(2024, 12, 31)).unwrap(), utc(2025, 1, 1));
    }

    #[test]
    fn staging_without_ship_by_is_an_error() {
        let snap = snapshot(Some("no directive"), None);
        assert!(matches!(
            reconcile(&snap),
            Err(ShipByError::MissingShipBy)
        ));
        assert!(matches!(
            reconcile(&snapshot(None, None)),
            Err(ShipByError::MissingShipBy)
        ));
    }

    #[test]
    fn missing_ship_by_with_valid_directive_adopts_delivery_date() {
        let snap = snapshot(Some("Delivery-Date: 2024/10/11"), None);
        let decision = reconcile(&snap).unwrap();
        assert_eq!(
            decision,
            Decision::Update {
                ship_by: utc(2024, 10, 11),
                note: "Delivery-Date: 2024/10/11".into(),
                staged: None,
            }
        );
        assert_eq!(rerun(&decision), Decision::NoOp);
    }

    #[test]
    fn every_staging_path_is_idempotent() {
        let ship_by = Some(utc(2024, 6, 30));
        for note in [
            None,
            Some("leave with neighbour"),
            Some("Delivery-Date: 2024/06/01"),
            Some("Delivery-Date: 2024/06/29\nDelivery-Date: whenever"),
            Some("Delivery-Date: 2024/02/31"),
        ] {
            let decision = reconcile(&snapshot(note, ship_by)).unwrap();
            assert_eq!(rerun(&decision), Decision::NoOp, "note: {note:?}");
        }
    }
}
