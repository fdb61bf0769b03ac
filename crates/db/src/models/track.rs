//! Track, section and sequence models and DTOs.
//!
//! A track owns an ordered list of sections; a section owns an ordered list
//! of sequences; each sequence points at exactly one content or form.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trilha_core::hierarchy::OrderEntry;
use trilha_core::serde_helpers::optional_date;
use trilha_core::types::{DbId, Timestamp};

use super::content::Content;
use super::form::Form;

/// A row from the `tracks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Track {
    pub id: DbId,
    pub context_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `sections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Section {
    pub id: DbId,
    pub track_id: DbId,
    pub name: Option<String>,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `sequences` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Sequence {
    pub id: DbId,
    pub section_id: DbId,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub content_id: Option<DbId>,
    pub form_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Hydrated views
// ---------------------------------------------------------------------------

/// A track with its sections, sequences and their content/form.
#[derive(Debug, Clone, Serialize)]
pub struct TrackDetail {
    #[serde(flatten)]
    pub track: Track,
    pub sections: Vec<SectionDetail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionDetail {
    #[serde(flatten)]
    pub section: Section,
    pub sequences: Vec<SequenceDetail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SequenceDetail {
    #[serde(flatten)]
    pub sequence: Sequence,
    pub content: Option<Content>,
    pub form: Option<Form>,
}

impl TrackDetail {
    /// Nest flat query results into a detail tree.
    ///
    /// `sections` and `sequences` must already be in display order; that order
    /// is preserved. Sequences whose section is not in `sections` are dropped.
    pub fn assemble(
        track: Track,
        sections: Vec<Section>,
        sequences: Vec<Sequence>,
        contents: Vec<Content>,
        forms: Vec<Form>,
    ) -> Self {
        let contents: HashMap<DbId, Content> = contents.into_iter().map(|c| (c.id, c)).collect();
        let forms: HashMap<DbId, Form> = forms.into_iter().map(|f| (f.id, f)).collect();

        let mut by_section: HashMap<DbId, Vec<SequenceDetail>> = HashMap::new();
        for sequence in sequences {
            let content = sequence.content_id.and_then(|id| contents.get(&id).cloned());
            let form = sequence.form_id.and_then(|id| forms.get(&id).cloned());
            by_section
                .entry(sequence.section_id)
                .or_default()
                .push(SequenceDetail {
                    sequence,
                    content,
                    form,
                });
        }

        let sections = sections
            .into_iter()
            .map(|section| {
                let sequences = by_section.remove(&section.id).unwrap_or_default();
                SectionDetail { section, sequences }
            })
            .collect();

        Self { track, sections }
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// DTO for creating a track together with its sections and sequences.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTrack {
    pub name: String,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "optional_date")]
    pub end_date: Option<NaiveDate>,
    /// Owning context. Falls back to a context managed by the acting user.
    pub context_id: Option<DbId>,
    #[serde(default)]
    pub sections: Vec<CreateSection>,
}

/// A section definition nested in [`CreateTrack`] / [`UpdateTrack`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateSection {
    pub name: Option<String>,
    /// Defaults to the section's position in the list.
    pub order: Option<i32>,
    #[serde(default)]
    pub sequences: Vec<CreateSequence>,
}

/// A sequence definition nested in [`CreateSection`]. Exactly one of
/// `content_id` / `form_id` must be set.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateSequence {
    /// Defaults to the sequence's position in the list.
    pub order: Option<i32>,
    pub content_id: Option<DbId>,
    pub form_id: Option<DbId>,
}

/// DTO for updating a track. Scalar fields are optional; a present
/// `sections` list replaces the whole section/sequence subtree.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTrack {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "optional_date")]
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
    pub sections: Option<Vec<CreateSection>>,
}

/// Body of `PUT /tracks/{track_id}/sections/reorder`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReorderSections {
    pub sections: Vec<OrderEntry>,
}

/// Body of `PUT /tracks/{track_id}/sections/{section_id}/sequences/reorder`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReorderSequences {
    pub sequences: Vec<OrderEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn track() -> Track {
        Track {
            id: 1,
            context_id: 1,
            name: "Onboarding".into(),
            description: None,
            start_date: None,
            end_date: None,
            is_active: true,
            created_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn section(id: DbId, order: i32) -> Section {
        Section {
            id,
            track_id: 1,
            name: None,
            sort_order: order,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sequence(
        id: DbId,
        section_id: DbId,
        order: i32,
        content_id: Option<DbId>,
        form_id: Option<DbId>,
    ) -> Sequence {
        Sequence {
            id,
            section_id,
            sort_order: order,
            content_id,
            form_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn content(id: DbId) -> Content {
        Content {
            id,
            title: format!("Content {id}"),
            slug: format!("content-{id}"),
            body: String::new(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn form(id: DbId) -> Form {
        Form {
            id,
            title: format!("Form {id}"),
            description: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn assemble_nests_sequences_under_their_sections_in_order() {
        let detail = TrackDetail::assemble(
            track(),
            vec![section(10, 0), section(11, 1)],
            vec![
                sequence(100, 10, 0, Some(7), None),
                sequence(101, 11, 0, None, Some(8)),
                sequence(102, 10, 1, Some(7), None),
            ],
            vec![content(7)],
            vec![form(8)],
        );

        assert_eq!(detail.sections.len(), 2);
        let first: Vec<DbId> = detail.sections[0]
            .sequences
            .iter()
            .map(|s| s.sequence.id)
            .collect();
        assert_eq!(first, vec![100, 102]);
        assert_eq!(detail.sections[1].sequences.len(), 1);

        let slot = &detail.sections[1].sequences[0];
        assert!(slot.content.is_none());
        assert_eq!(slot.form.as_ref().map(|f| f.id), Some(8));
        assert_eq!(
            detail.sections[0].sequences[0].content.as_ref().map(|c| c.id),
            Some(7)
        );
    }

    #[test]
    fn assemble_keeps_empty_sections() {
        let detail = TrackDetail::assemble(track(), vec![section(10, 0)], vec![], vec![], vec![]);
        assert_eq!(detail.sections.len(), 1);
        assert!(detail.sections[0].sequences.is_empty());
    }

    #[test]
    fn detail_serializes_order_field_and_flattens() {
        let detail = TrackDetail::assemble(
            track(),
            vec![section(10, 3)],
            vec![sequence(100, 10, 2, Some(7), None)],
            vec![content(7)],
            vec![],
        );
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["name"], "Onboarding");
        assert_eq!(json["sections"][0]["order"], 3);
        assert_eq!(json["sections"][0]["sequences"][0]["order"], 2);
        assert_eq!(json["sections"][0]["sequences"][0]["content"]["slug"], "content-7");
        assert!(json["sections"][0].get("sort_order").is_none());
    }

    #[test]
    fn create_track_accepts_empty_dates_and_nested_children() {
        let input: CreateTrack = serde_json::from_value(serde_json::json!({
            "name": "T",
            "start_date": "",
            "end_date": "2024-12-31",
            "sections": [{ "sequences": [{ "content_id": 1 }, { "form_id": 2 }] }]
        }))
        .unwrap();
        assert_eq!(input.start_date, None);
        assert_eq!(input.end_date, NaiveDate::from_ymd_opt(2024, 12, 31));
        assert_eq!(input.sections[0].sequences.len(), 2);
    }

    #[test]
    fn create_track_rejects_unknown_fields() {
        let result: Result<CreateTrack, _> =
            serde_json::from_value(serde_json::json!({ "name": "T", "colour": "red" }));
        assert!(result.is_err());
    }
}
