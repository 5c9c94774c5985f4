//! # Rule Catalog
//!
//! The static, process-wide registry of racing rules a race committee can
//! select from. Entries are listed in rulebook order (parts 1 to 5, then the
//! appendices, then the US Sailing prescriptions) and that order is the order
//! clauses appear in generated documents.
//!
//! The catalog is a `static` table: lookups borrow from it directly and never
//! allocate, so it is safe to read from any number of request handlers
//! without locking.

use serde::Serialize;

use crate::error::CatalogError;
use crate::rule::{DocumentSection, RuleCategory, RuleDefinition};

const PART_1: &str = "Part 1 - Fundamental Rules";
const PART_2: &str = "Part 2 - When Boats Meet";
const PART_3: &str = "Part 3 - Conduct of a Race";
const PART_4: &str = "Part 4 - Other Requirements When Racing";
const PART_5: &str = "Part 5 - Protests, Redress, Hearings";
const APPENDICES: &str = "Appendices";
const PRESCRIPTIONS: &str = "US Sailing Prescriptions";

#[allow(clippy::too_many_arguments)]
const fn rule(
    id: &'static str,
    number: &'static str,
    title: &'static str,
    description: &'static str,
    category: RuleCategory,
    applies_if_mentioned: bool,
    default_text: &'static str,
    section: DocumentSection,
    can_modify: bool,
    part: &'static str,
) -> RuleDefinition {
    RuleDefinition {
        id,
        number,
        title,
        description,
        category,
        applies_if_mentioned,
        default_text,
        section,
        can_modify,
        part,
    }
}

use DocumentSection::{Both, Nor, Si};
use RuleCategory::{Appendix, Prescription, Rrs};

/// Every rule the system knows about, in rulebook order.
pub static RULES: &[RuleDefinition] = &[
    // ── Part 1 ───────────────────────────────────────────────────────
    rule(
        "rule-1",
        "1",
        "Safety",
        "Helping those in danger and life-saving equipment",
        Rrs,
        false,
        "Boats shall comply with RRS 1 (Safety).",
        Both,
        false,
        PART_1,
    ),
    rule(
        "rule-2",
        "2",
        "Fair Sailing",
        "Compete with recognized principles of sportsmanship",
        Rrs,
        false,
        "Boats shall comply with RRS 2 (Fair Sailing).",
        Both,
        false,
        PART_1,
    ),
    // ── Part 2 ───────────────────────────────────────────────────────
    rule(
        "rule-10",
        "10",
        "On Opposite Tacks",
        "Port-tack boat keeps clear of starboard-tack boat",
        Rrs,
        false,
        "Boats shall comply with RRS Part 2 (When Boats Meet).",
        Both,
        false,
        PART_2,
    ),
    rule(
        "rule-18",
        "18",
        "Mark-Room",
        "Mark-room requirements at marks",
        Rrs,
        false,
        "Boats shall comply with RRS 18 (Mark-Room).",
        Both,
        false,
        PART_2,
    ),
    // ── Part 3 ───────────────────────────────────────────────────────
    rule(
        "rule-26",
        "26",
        "Starting Races",
        "Starting sequence and signals",
        Rrs,
        false,
        "Races will be started using RRS 26.",
        Si,
        true,
        PART_3,
    ),
    rule(
        "rule-30.1",
        "30.1",
        "I Flag Rule",
        "Round-an-end rule - boats OCS must return around an end",
        Rrs,
        true,
        "Rule 30.1 (I Flag) applies. If flag I has been displayed, and any part of a boat's hull, crew or equipment is on the course side during the minute before her starting signal, she shall sail to the pre-start side around an end of the starting line before starting.",
        Si,
        true,
        PART_3,
    ),
    rule(
        "rule-30.2",
        "30.2",
        "Z Flag Rule",
        "20% scoring penalty for boats OCS",
        Rrs,
        true,
        "Rule 30.2 (Z Flag) applies. Boats identified as OCS shall receive a 20% scoring penalty without a hearing.",
        Si,
        false,
        PART_3,
    ),
    rule(
        "rule-30.3",
        "30.3",
        "U Flag Rule",
        "Boats in triangle during last minute are scored DNS",
        Rrs,
        true,
        "Rule 30.3 (U Flag) applies. Boats in the triangle during the last minute shall be scored Did Not Start (DNS).",
        Si,
        false,
        PART_3,
    ),
    rule(
        "rule-30.4",
        "30.4",
        "Black Flag Rule",
        "Boats in triangle during last minute are disqualified without hearing",
        Rrs,
        true,
        "Rule 30.4 (Black Flag) applies. Boats in the triangle during the last minute shall be disqualified without a hearing, even if the race is restarted or resailed.",
        Si,
        false,
        PART_3,
    ),
    rule(
        "rule-32",
        "32",
        "Shortened Course",
        "The race committee may shorten the course",
        Rrs,
        false,
        "The race committee may shorten the course in accordance with RRS 32.",
        Si,
        false,
        PART_3,
    ),
    rule(
        "rule-35",
        "35",
        "Time Limits",
        "Time limits for completing races",
        Rrs,
        false,
        "Time limits are specified in the sailing instructions.",
        Si,
        true,
        PART_3,
    ),
    rule(
        "rule-37",
        "37",
        "VHF Monitoring",
        "When flag V is displayed, monitor VHF for safety instructions",
        Rrs,
        true,
        "When flag V is displayed, boats shall monitor the designated VHF channel for safety instructions.",
        Si,
        false,
        PART_3,
    ),
    // ── Part 4 ───────────────────────────────────────────────────────
    rule(
        "rule-40",
        "40",
        "Personal Flotation Devices",
        "Requirements for wearing PFDs",
        Rrs,
        true,
        "Personal flotation devices are required to be worn pursuant to RRS 40.1 and 40.2(c).",
        Both,
        false,
        PART_4,
    ),
    rule(
        "rule-42",
        "42",
        "Propulsion",
        "Restrictions on methods of propulsion",
        Rrs,
        false,
        "Boats shall comply with RRS 42 (Propulsion).",
        Both,
        false,
        PART_4,
    ),
    rule(
        "rule-44",
        "44",
        "Penalties at the Time of an Incident",
        "Two-turns and one-turn penalties",
        Rrs,
        false,
        "The penalty for breaking a rule of Part 2 shall be a Two-Turns Penalty under RRS 44.2.",
        Si,
        true,
        PART_4,
    ),
    rule(
        "rule-49",
        "49",
        "Crew Position",
        "Competitors shall not station torsos outside lifelines",
        Rrs,
        false,
        "Boats shall comply with RRS 49 (Crew Position).",
        Both,
        false,
        PART_4,
    ),
    // ── Part 5 ───────────────────────────────────────────────────────
    rule(
        "rule-60",
        "60",
        "Right to Protest",
        "A boat may protest another boat",
        Rrs,
        false,
        "Boats may protest in accordance with RRS 60.",
        Si,
        false,
        PART_5,
    ),
    rule(
        "rule-61",
        "61",
        "Protest Requirements",
        "Requirements for valid protests",
        Rrs,
        false,
        "Protests shall be submitted in accordance with RRS 61.",
        Si,
        true,
        PART_5,
    ),
    rule(
        "rule-63",
        "63",
        "Hearings",
        "Procedures for protest hearings",
        Rrs,
        false,
        "Hearings will be conducted in accordance with RRS 63.",
        Si,
        false,
        PART_5,
    ),
    // ── Appendices ───────────────────────────────────────────────────
    rule(
        "appendix-a",
        "Appendix A",
        "Scoring",
        "Low Point Scoring System",
        Appendix,
        false,
        "The Low Point Scoring System will be used as provided in Appendix A.",
        Nor,
        true,
        APPENDICES,
    ),
    rule(
        "appendix-p",
        "Appendix P",
        "Special Procedures for Rule 42",
        "Procedures for observers to penalize rule 42 violations",
        Appendix,
        true,
        "Appendix P (Special Procedures for Rule 42) applies.",
        Si,
        false,
        APPENDICES,
    ),
    rule(
        "appendix-t",
        "Appendix T",
        "Arbitration",
        "Arbitration procedures for protests",
        Appendix,
        true,
        "Appendix T (Arbitration) applies.",
        Si,
        false,
        APPENDICES,
    ),
    // ── US Sailing prescriptions ─────────────────────────────────────
    rule(
        "appendix-v1",
        "Appendix V1",
        "One-Turn Penalty (US Sailing)",
        "Allows one-turn penalty for certain infractions",
        Prescription,
        true,
        "Appendix V1 (allowing one-turn exoneration of certain fouls), but not V2, of the US Sailing Prescriptions applies.",
        Si,
        false,
        PRESCRIPTIONS,
    ),
    rule(
        "us-25.1",
        "US 25.1",
        "NoR and SI Availability",
        "RC must ensure NoR and SI are readily available",
        Prescription,
        false,
        "US Sailing prescribes that the race committee shall ensure that the notice of race and sailing instructions are readily available to each boat until the end of the event.",
        Both,
        false,
        PRESCRIPTIONS,
    ),
    rule(
        "us-part5",
        "US Part 5",
        "No Fees for Protests",
        "No fees shall be charged for protests or requests for redress",
        Prescription,
        false,
        "US Sailing prescribes that no fees shall be charged for protests or requests for redress.",
        Si,
        false,
        PRESCRIPTIONS,
    ),
    rule(
        "us-34",
        "US 34",
        "Finishing When Mark Missing",
        "Procedure when finishing mark is missing",
        Prescription,
        false,
        "US Sailing prescribes that if a finishing mark is missing but another remains, the finishing line is a line through the remaining mark at 90\u{b0} to the last leg.",
        Si,
        false,
        PRESCRIPTIONS,
    ),
    rule(
        "us-76.1",
        "US 76.1",
        "Competitor Eligibility",
        "Prohibition on arbitrary rejection of entries",
        Prescription,
        false,
        "US Sailing prescribes that an organizing authority shall not reject entries for arbitrary or capricious reasons or for reason of race, color, religion, national origin, gender, sexual orientation, or age.",
        Nor,
        false,
        PRESCRIPTIONS,
    ),
    rule(
        "us-81",
        "US 81",
        "Hold Harmless Agreements",
        "The organizing authority shall not require competitors to assume liabilities",
        Prescription,
        false,
        "US Sailing prescribes that the organizing authority shall not require a competitor to assume any liabilities of the organizing authority, race committee, protest committee, host club, sponsors, or any other organization or official involved with the event.",
        Nor,
        false,
        PRESCRIPTIONS,
    ),
];

/// A commonly used replacement text for a modifiable rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Rule number the suggestion applies to, as printed in the rulebook.
    pub rule_number: &'static str,
    /// Proposed clause text. Bracketed placeholders are left for the editor.
    pub text: &'static str,
    /// What the change does.
    pub reason: &'static str,
}

/// Frequently used modifications, keyed by rule number.
///
/// Rule 31.2 has no catalog entry; its suggestion is still listed so that a
/// catalog extension picks it up without further changes.
pub static SUGGESTIONS: &[Suggestion] = &[
    Suggestion {
        rule_number: "26",
        text: "Official signals will be made orally by radio on VHF channel [XX]. Placards or flags may not be displayed. (Changes Rule 26.)",
        reason: "Changes starting signal method to radio only",
    },
    Suggestion {
        rule_number: "30.1",
        text: "Rule 30.1 (banning dip starts) applies whether or not the I Flag is displayed.",
        reason: "Makes I Flag rule always apply without flag display",
    },
    Suggestion {
        rule_number: "31.2",
        text: "Any physical contact with the actual Committee Boat shall not be exonerated. (Changes RRS 31.2.)",
        reason: "Stricter penalty for hitting RC boat",
    },
    Suggestion {
        rule_number: "35",
        text: "No finishes will be recorded after the end of the time limit. (Changes Rule 35.)",
        reason: "Strict time limit enforcement",
    },
    Suggestion {
        rule_number: "44",
        text: "The penalty for breaking a rule of Part 2 shall be a One-Turn Penalty (one tack and one gybe) under modified RRS 44.2.",
        reason: "Changes from two-turns to one-turn penalty",
    },
    Suggestion {
        rule_number: "61",
        text: "Protests must be submitted in writing per RRS 61.2 and either hand-delivered by [time] or mailed postmarked no later than [date].",
        reason: "Specifies protest submission requirements",
    },
];

/// All catalog entries in rulebook order.
pub fn list_rules() -> &'static [RuleDefinition] {
    RULES
}

/// Look up a rule by catalog id.
///
/// # Errors
///
/// Returns [`CatalogError::NotFound`] for ids not in the catalog.
pub fn get_rule(id: &str) -> Result<&'static RuleDefinition, CatalogError> {
    RULES
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| CatalogError::NotFound(id.to_string()))
}

/// Catalog entries matching the optional category and section filters,
/// preserving rulebook order.
///
/// A `section` filter of `nor` also yields rules tagged `both`, matching what
/// ends up in that document.
pub fn filter_rules(
    category: Option<RuleCategory>,
    section: Option<DocumentSection>,
) -> impl Iterator<Item = &'static RuleDefinition> {
    RULES.iter().filter(move |r| {
        category.map_or(true, |c| r.category == c)
            && section.map_or(true, |s| match s {
                DocumentSection::Both => r.section == DocumentSection::Both,
                DocumentSection::Nor | DocumentSection::Si => {
                    r.section == s || r.section == DocumentSection::Both
                }
            })
    })
}

/// Suggested override texts for a rule.
///
/// Rules that cannot be modified never have suggestions.
pub fn suggestions_for(rule: &RuleDefinition) -> Vec<&'static Suggestion> {
    if !rule.can_modify {
        return Vec::new();
    }
    SUGGESTIONS
        .iter()
        .filter(|s| s.rule_number == rule.number)
        .collect()
}
