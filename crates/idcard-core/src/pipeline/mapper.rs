//! Label-to-field mapping and conflict resolution.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use regex::Regex;
use tracing::{debug, trace};

use crate::models::result::{CandidateSource, FieldCandidate, FieldName};
use crate::models::token::EntityLabel;
use crate::rules::text::{char_offset, char_slice};

use super::aligner::AlignedEntity;
use super::normalizer::NormalizedText;

/// How entities with a given label become field candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRoute {
    /// Each entity is a candidate for this field.
    Direct(FieldName),
    /// Generic dates: the first by position is the date of birth, the
    /// second the expiry date, later ones are dropped. Card layouts vary,
    /// so this is a heuristic rather than a guarantee.
    DateByPosition,
    /// All such spans are concatenated into one candidate.
    Joined(FieldName),
    /// No field.
    Unmapped,
}

/// Fixed route table.
pub fn route(label: &EntityLabel) -> FieldRoute {
    match label {
        EntityLabel::Person => FieldRoute::Direct(FieldName::Name),
        EntityLabel::IdNumber => FieldRoute::Direct(FieldName::IdNumber),
        EntityLabel::DateOfBirth => FieldRoute::Direct(FieldName::DateOfBirth),
        EntityLabel::ExpiryDate => FieldRoute::Direct(FieldName::ExpiryDate),
        EntityLabel::Date => FieldRoute::DateByPosition,
        EntityLabel::Address | EntityLabel::Location => FieldRoute::Joined(FieldName::Address),
        EntityLabel::Org | EntityLabel::Other(_) => FieldRoute::Unmapped,
    }
}

const POSITIONAL_DATES: [FieldName; 2] = [FieldName::DateOfBirth, FieldName::ExpiryDate];

/// Turns aligned entities into at most one candidate per field.
#[derive(Debug, Clone, Copy)]
pub struct FieldMapper<'a> {
    aliases: &'a BTreeMap<String, EntityLabel>,
    address_separator: &'a str,
    id_fallback: &'a Regex,
    fallback_confidence: f32,
}

impl<'a> FieldMapper<'a> {
    pub fn new(
        aliases: &'a BTreeMap<String, EntityLabel>,
        address_separator: &'a str,
        id_fallback: &'a Regex,
        fallback_confidence: f32,
    ) -> Self {
        Self {
            aliases,
            address_separator,
            id_fallback,
            fallback_confidence,
        }
    }

    /// `aliases` must be keyed by [`EntityLabel::key`].
    fn resolve_label<'l>(&'l self, label: &'l EntityLabel) -> &'l EntityLabel {
        self.aliases
            .get(&EntityLabel::key(label.as_str()))
            .unwrap_or(label)
    }

    /// Map entities (in document order) to candidates, then fall back to the
    /// ID pattern if no entity produced an ID number.
    pub fn map(
        &self,
        normalized: &NormalizedText,
        aligned: &[AlignedEntity],
    ) -> BTreeMap<FieldName, FieldCandidate> {
        let mut order: Vec<&AlignedEntity> = aligned.iter().collect();
        order.sort_by_key(|a| (a.entity.start, a.entity.end));

        let mut candidates = BTreeMap::new();
        let mut dates_seen = 0usize;
        let mut joined: BTreeMap<FieldName, Vec<&AlignedEntity>> = BTreeMap::new();

        for item in order {
            match route(self.resolve_label(&item.entity.label)) {
                FieldRoute::Direct(field) => {
                    offer(&mut candidates, entity_candidate(field, normalized, item));
                }
                FieldRoute::DateByPosition => {
                    if let Some(&field) = POSITIONAL_DATES.get(dates_seen) {
                        offer(&mut candidates, entity_candidate(field, normalized, item));
                    } else {
                        trace!("Ignoring extra date at {}..{}", item.entity.start, item.entity.end);
                    }
                    dates_seen += 1;
                }
                FieldRoute::Joined(field) => joined.entry(field).or_default().push(item),
                FieldRoute::Unmapped => {
                    trace!("Unmapped entity label {}", item.entity.label);
                }
            }
        }

        for (field, parts) in joined {
            if let Some(candidate) = self.joined_candidate(field, normalized, &parts) {
                offer(&mut candidates, candidate);
            }
        }

        if !candidates.contains_key(&FieldName::IdNumber) {
            if let Some(candidate) = self.fallback_id(normalized) {
                debug!("ID number taken from fallback pattern at {:?}", candidate.source_span);
                offer(&mut candidates, candidate);
            }
        }

        candidates
    }

    fn joined_candidate(
        &self,
        field: FieldName,
        normalized: &NormalizedText,
        parts: &[&AlignedEntity],
    ) -> Option<FieldCandidate> {
        let first = parts.first()?;
        let last = parts.last()?;

        let raw_value = parts
            .iter()
            .map(|p| char_slice(&normalized.text, p.entity.start, p.entity.end))
            .collect::<Vec<_>>()
            .join(self.address_separator);

        let confidence =
            parts.iter().map(|p| p.entity.confidence).sum::<f32>() / parts.len() as f32;

        let mut tokens: Vec<usize> = parts.iter().flat_map(|p| p.tokens.iter().copied()).collect();
        tokens.sort_unstable();
        tokens.dedup();

        Some(FieldCandidate {
            field,
            raw_value,
            confidence,
            source_span: (first.entity.start, last.entity.end),
            tokens,
            source: CandidateSource::Entity,
        })
    }

    fn fallback_id(&self, normalized: &NormalizedText) -> Option<FieldCandidate> {
        let folded = normalized.folded();
        let m = self.id_fallback.find(&folded)?;
        let raw_value = &normalized.text[m.start()..m.end()];
        let start = char_offset(&normalized.text, m.start());
        let end = start + raw_value.chars().count();

        Some(FieldCandidate {
            field: FieldName::IdNumber,
            raw_value: raw_value.to_string(),
            confidence: self.fallback_confidence,
            source_span: (start, end),
            tokens: Vec::new(),
            source: CandidateSource::RegexFallback,
        })
    }
}

fn entity_candidate(
    field: FieldName,
    normalized: &NormalizedText,
    item: &AlignedEntity,
) -> FieldCandidate {
    FieldCandidate {
        field,
        raw_value: char_slice(&normalized.text, item.entity.start, item.entity.end).to_string(),
        confidence: item.entity.confidence,
        source_span: (item.entity.start, item.entity.end),
        tokens: item.tokens.clone(),
        source: CandidateSource::Entity,
    }
}

/// Keep the stronger of two candidates for the same field: strictly higher
/// confidence wins, ties go to the one starting earlier.
fn offer(candidates: &mut BTreeMap<FieldName, FieldCandidate>, candidate: FieldCandidate) {
    match candidates.entry(candidate.field) {
        Entry::Vacant(slot) => {
            slot.insert(candidate);
        }
        Entry::Occupied(mut slot) => {
            let current = slot.get();
            let wins = candidate.confidence > current.confidence
                || (candidate.confidence == current.confidence
                    && candidate.source_span.0 < current.source_span.0);
            if wins {
                slot.insert(candidate);
            }
        }
    }
}
