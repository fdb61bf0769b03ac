//! Track → Section → Sequence management.
//!
//! Every write opens one transaction and commits only after all rows are in
//! place, so a failure at any step leaves the tree as it was. Writes that
//! read orders before changing them first lock the parent row (the track for
//! section orders, the section for sequence orders), so concurrent writers
//! under the same parent run one after the other. Successful writes return
//! the hydrated [`TrackDetail`], read back after commit.

use sqlx::{PgPool, Postgres, Transaction};
use trilha_core::error::CoreError;
use trilha_core::hierarchy::{
    compact_orders, next_order, positional_orders, validate_reorder, OrderEntry, SequenceTarget,
};
use trilha_core::track::{validate_date_range, validate_track_name};
use trilha_core::types::DbId;
use trilha_db::models::track::{CreateSection, CreateTrack, Section, TrackDetail, UpdateTrack};
use trilha_db::repositories::{
    ContentRepo, ContextRepo, FormRepo, SectionRepo, SequenceRepo, TrackRepo,
};

use crate::error::{AppError, AppResult};

type Tx<'c> = Transaction<'c, Postgres>;

/// A section definition after order resolution and target validation.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PlannedSection {
    name: Option<String>,
    order: i32,
    sequences: Vec<(i32, SequenceTarget)>,
}

/// Resolve orders and sequence targets for a nested section list without
/// touching the database. Blank section names become `None`.
fn plan_sections(sections: &[CreateSection]) -> Result<Vec<PlannedSection>, CoreError> {
    let section_orders = positional_orders(sections.iter().map(|s| s.order));

    sections
        .iter()
        .zip(section_orders)
        .map(|(section, order)| {
            let sequence_orders = positional_orders(section.sequences.iter().map(|s| s.order));
            let sequences = section
                .sequences
                .iter()
                .zip(sequence_orders)
                .map(|(seq, order)| {
                    SequenceTarget::from_ids(seq.content_id, seq.form_id).map(|t| (order, t))
                })
                .collect::<Result<Vec<_>, CoreError>>()?;

            let name = section
                .name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string);

            Ok(PlannedSection {
                name,
                order,
                sequences,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Track lifecycle
// ---------------------------------------------------------------------------

/// Create a track with its nested sections and sequences.
///
/// The owning context is `input.context_id` when given, otherwise the first
/// context managed by `acting_user`. Without either the caller may not
/// create tracks.
pub async fn create_track(
    pool: &PgPool,
    input: &CreateTrack,
    acting_user: DbId,
) -> AppResult<TrackDetail> {
    validate_track_name(&input.name)?;
    validate_date_range(input.start_date, input.end_date)?;
    let plan = plan_sections(&input.sections)?;

    let mut tx = pool.begin().await?;

    let context_id = match input.context_id {
        Some(id) => {
            ContextRepo::find_by_id(&mut *tx, id)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "Context",
                    id,
                })?
                .id
        }
        None => {
            ContextRepo::first_managed_by(&mut *tx, acting_user)
                .await?
                .ok_or_else(|| {
                    CoreError::Forbidden(
                        "No context available: pass context_id or manage a context".into(),
                    )
                })?
                .id
        }
    };

    let track = TrackRepo::create(&mut *tx, context_id, Some(acting_user), input).await?;
    insert_sections(&mut tx, track.id, &plan).await?;

    tx.commit().await?;
    load_detail(pool, track.id).await
}

/// Apply scalar changes and, when `patch.sections` is present, replace the
/// whole section/sequence subtree.
pub async fn update_track(pool: &PgPool, id: DbId, patch: &UpdateTrack) -> AppResult<TrackDetail> {
    if let Some(name) = &patch.name {
        validate_track_name(name)?;
    }
    let plan = patch.sections.as_deref().map(plan_sections).transpose()?;

    let mut tx = pool.begin().await?;

    let existing = TrackRepo::find_by_id_for_update(&mut *tx, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Track", id })?;
    validate_date_range(
        patch.start_date.or(existing.start_date),
        patch.end_date.or(existing.end_date),
    )?;

    TrackRepo::update(&mut *tx, id, patch)
        .await?
        .ok_or(CoreError::NotFound { entity: "Track", id })?;

    if let Some(plan) = plan {
        let sequences = SequenceRepo::delete_for_track(&mut *tx, id).await?;
        let sections = SectionRepo::delete_for_track(&mut *tx, id).await?;
        tracing::debug!(track_id = id, sections, sequences, "Replacing track subtree");
        insert_sections(&mut tx, id, &plan).await?;
    }

    tx.commit().await?;
    load_detail(pool, id).await
}

/// Soft delete. Unknown and already-inactive tracks are not found.
pub async fn deactivate_track(pool: &PgPool, id: DbId) -> AppResult<()> {
    if !TrackRepo::deactivate(pool, id).await? {
        return Err(CoreError::NotFound { entity: "Track", id }.into());
    }
    Ok(())
}

/// Hydrated track by id, active or not.
pub async fn get_track(pool: &PgPool, id: DbId) -> AppResult<TrackDetail> {
    load_detail(pool, id).await
}

// ---------------------------------------------------------------------------
// Sequence append / remove
// ---------------------------------------------------------------------------

/// Append a sequence pointing at `target` to the end of a section.
pub async fn append_sequence(
    pool: &PgPool,
    track_id: DbId,
    section_id: DbId,
    target: SequenceTarget,
) -> AppResult<TrackDetail> {
    let mut tx = pool.begin().await?;

    let section = section_in_track(&mut tx, track_id, section_id).await?;
    ensure_target_exists(&mut tx, target).await?;

    let orders: Vec<i32> = SequenceRepo::list_for_section(&mut *tx, section.id)
        .await?
        .iter()
        .map(|s| s.sort_order)
        .collect();
    let order = next_order(&orders)?;
    let sequence = SequenceRepo::create(&mut *tx, section.id, order, target).await?;

    tx.commit().await?;
    tracing::debug!(track_id, section_id, sequence_id = sequence.id, order, "Sequence appended");
    load_detail(pool, track_id).await
}

/// Delete a sequence and renumber the rest of its section densely.
pub async fn remove_sequence(
    pool: &PgPool,
    track_id: DbId,
    section_id: DbId,
    sequence_id: DbId,
) -> AppResult<TrackDetail> {
    let mut tx = pool.begin().await?;

    let section = section_in_track(&mut tx, track_id, section_id).await?;
    SequenceRepo::find_in_section(&mut *tx, section.id, sequence_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Sequence",
            id: sequence_id,
        })?;
    SequenceRepo::delete(&mut *tx, sequence_id).await?;

    let remaining: Vec<(DbId, i32)> = SequenceRepo::list_for_section(&mut *tx, section.id)
        .await?
        .iter()
        .map(|s| (s.id, s.sort_order))
        .collect();
    let writes = compact_orders(&remaining);
    for OrderEntry { id, order } in &writes {
        SequenceRepo::set_order(&mut *tx, *id, *order).await?;
    }

    tx.commit().await?;
    tracing::debug!(
        track_id,
        section_id,
        sequence_id,
        renumbered = writes.len(),
        "Sequence removed",
    );
    load_detail(pool, track_id).await
}

// ---------------------------------------------------------------------------
// Reordering
// ---------------------------------------------------------------------------

/// Overwrite section orders. `entries` must list every section of the track
/// exactly once with orders forming `0..n-1`.
pub async fn reorder_sections(
    pool: &PgPool,
    track_id: DbId,
    entries: &[OrderEntry],
) -> AppResult<TrackDetail> {
    let mut tx = pool.begin().await?;

    TrackRepo::find_by_id_for_update(&mut *tx, track_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Track",
            id: track_id,
        })?;

    let current: Vec<DbId> = SectionRepo::list_for_track(&mut *tx, track_id)
        .await?
        .iter()
        .map(|s| s.id)
        .collect();
    validate_reorder("section", &current, entries)?;

    for entry in entries {
        SectionRepo::set_order(&mut *tx, entry.id, entry.order).await?;
    }

    tx.commit().await?;
    load_detail(pool, track_id).await
}

/// Overwrite sequence orders within one section of a track.
pub async fn reorder_sequences(
    pool: &PgPool,
    track_id: DbId,
    section_id: DbId,
    entries: &[OrderEntry],
) -> AppResult<TrackDetail> {
    let mut tx = pool.begin().await?;

    let section = section_in_track(&mut tx, track_id, section_id).await?;
    let current: Vec<DbId> = SequenceRepo::list_for_section(&mut *tx, section.id)
        .await?
        .iter()
        .map(|s| s.id)
        .collect();
    validate_reorder("sequence", &current, entries)?;

    for entry in entries {
        SequenceRepo::set_order(&mut *tx, entry.id, entry.order).await?;
    }

    tx.commit().await?;
    load_detail(pool, track_id).await
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn insert_sections(
    tx: &mut Tx<'_>,
    track_id: DbId,
    plan: &[PlannedSection],
) -> AppResult<()> {
    for planned in plan {
        let section =
            SectionRepo::create(&mut **tx, track_id, planned.name.as_deref(), planned.order)
                .await?;
        for &(order, target) in &planned.sequences {
            ensure_target_exists(tx, target).await?;
            SequenceRepo::create(&mut **tx, section.id, order, target).await?;
        }
    }
    Ok(())
}

/// The section, provided it belongs to `track_id`, locked for the rest of
/// the transaction.
async fn section_in_track(tx: &mut Tx<'_>, track_id: DbId, section_id: DbId) -> AppResult<Section> {
    SectionRepo::find_in_track_for_update(&mut **tx, track_id, section_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Section",
                id: section_id,
            })
        })
}

async fn ensure_target_exists(tx: &mut Tx<'_>, target: SequenceTarget) -> AppResult<()> {
    let found = match target {
        SequenceTarget::Content(id) => ContentRepo::find_by_id(&mut **tx, id).await?.is_some(),
        SequenceTarget::Form(id) => FormRepo::find_by_id(&mut **tx, id).await?.is_some(),
    };
    if found {
        return Ok(());
    }
    let (entity, id) = match target {
        SequenceTarget::Content(id) => ("Content", id),
        SequenceTarget::Form(id) => ("Form", id),
    };
    Err(CoreError::NotFound { entity, id }.into())
}

async fn load_detail(pool: &PgPool, id: DbId) -> AppResult<TrackDetail> {
    TrackRepo::find_detail(pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Track", id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use trilha_db::models::track::CreateSequence;

    fn seq(order: Option<i32>, content_id: Option<DbId>, form_id: Option<DbId>) -> CreateSequence {
        CreateSequence {
            order,
            content_id,
            form_id,
        }
    }

    fn section(
        name: Option<&str>,
        order: Option<i32>,
        sequences: Vec<CreateSequence>,
    ) -> CreateSection {
        CreateSection {
            name: name.map(str::to_string),
            order,
            sequences,
        }
    }

    #[test]
    fn plan_assigns_positional_orders() {
        let input = vec![
            section(Some("Intro"), None, vec![seq(None, Some(1), None), seq(None, None, Some(2))]),
            section(None, None, vec![]),
            section(Some("  "), None, vec![seq(None, Some(3), None)]),
        ];

        let plan = plan_sections(&input).unwrap();
        assert_eq!(plan.len(), 3);
        assert_eq!(
            plan.iter().map(|s| s.order).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(
            plan[0].sequences,
            vec![(0, SequenceTarget::Content(1)), (1, SequenceTarget::Form(2))]
        );
        assert_eq!(plan[0].name.as_deref(), Some("Intro"));
        assert_eq!(plan[2].name, None);
    }

    #[test]
    fn plan_keeps_explicit_orders() {
        let input = vec![section(
            None,
            Some(5),
            vec![seq(Some(9), Some(1), None), seq(None, Some(1), None)],
        )];
        let plan = plan_sections(&input).unwrap();
        assert_eq!(plan[0].order, 5);
        assert_eq!(plan[0].sequences[0].0, 9);
        assert_eq!(plan[0].sequences[1].0, 1);
    }

    #[test]
    fn plan_rejects_sequence_with_both_targets() {
        let input = vec![section(None, None, vec![seq(None, Some(1), Some(2))])];
        assert_matches!(plan_sections(&input), Err(CoreError::Validation(_)));
    }

    #[test]
    fn plan_rejects_sequence_without_target() {
        let input = vec![section(None, None, vec![seq(Some(0), None, None)])];
        assert_matches!(plan_sections(&input), Err(CoreError::Validation(_)));
    }

    #[test]
    fn empty_plan_is_empty() {
        assert!(plan_sections(&[]).unwrap().is_empty());
    }
}
