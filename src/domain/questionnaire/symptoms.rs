//! Symptom profiles attached to diagnosed subtypes.

use serde::Serialize;

/// Typical cognitive, behavioral and emotional presentation of a subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SymptomProfile {
    pub cognitive: &'static str,
    pub behavioral: &'static str,
    pub emotional: &'static str,
}

const fn profile(
    cognitive: &'static str,
    behavioral: &'static str,
    emotional: &'static str,
) -> SymptomProfile {
    SymptomProfile {
        cognitive,
        behavioral,
        emotional,
    }
}

const PROFILES: &[(&str, SymptomProfile)] = &[
    // OCD
    (
        "contamination ocd",
        profile(
            "Persistent fears of germs or contaminants.",
            "Excessive hand washing and cleaning rituals.",
            "Anxiety and distress over perceived contamination.",
        ),
    ),
    (
        "symmetry ocd",
        profile(
            "Obsessions with order and exactness.",
            "Compulsive arranging and aligning of objects.",
            "Irritation when things feel 'off' or misaligned.",
        ),
    ),
    (
        "checking ocd",
        profile(
            "Intrusive doubts about safety or mistakes.",
            "Repeated checking of locks, appliances, etc.",
            "Relief followed by renewed anxiety after checking.",
        ),
    ),
    // Stress
    (
        "acute stress",
        profile(
            "Difficulty concentrating and memory lapses.",
            "Avoidance of reminders of the traumatic event.",
            "Emotional numbness and detachment.",
        ),
    ),
    (
        "chronic stress",
        profile(
            "Persistent worry and indecisiveness.",
            "Neglect of responsibilities and social withdrawal.",
            "Irritability and feelings of being overwhelmed.",
        ),
    ),
    (
        "episodic acute stress",
        profile(
            "Frequent episodes of intense stress.",
            "Overcommitment and inability to relax.",
            "Short-temperedness and anxiety.",
        ),
    ),
    // Depression
    (
        "major depressive disorder",
        profile(
            "Negative thoughts and hopelessness.",
            "Withdrawal from activities and social interactions.",
            "Persistent sadness and loss of interest.",
        ),
    ),
    (
        "postpartum depression",
        profile(
            "Difficulty bonding with the baby.",
            "Changes in eating and sleeping patterns.",
            "Feelings of inadequacy and guilt.",
        ),
    ),
    (
        "atypical depression",
        profile(
            "Sensitivity to rejection.",
            "Increased appetite and sleep.",
            "Mood reactivity to positive events.",
        ),
    ),
    // Anxiety
    (
        "generalized anxiety disorder",
        profile(
            "Excessive worry about various aspects of life.",
            "Avoidance of anxiety-inducing situations.",
            "Restlessness and feeling on edge.",
        ),
    ),
    (
        "panic disorder",
        profile(
            "Fear of impending doom during attacks.",
            "Avoidance of places where attacks occurred.",
            "Sudden surges of intense fear.",
        ),
    ),
    (
        "separation anxiety disorder",
        profile(
            "Worry about being separated from loved ones.",
            "Reluctance to be alone or away from attachment figures.",
            "Distress during periods of separation.",
        ),
    ),
    // Trauma
    (
        "single event trauma",
        profile(
            "Intrusive memories of the traumatic event.",
            "Avoidance of reminders associated with the trauma.",
            "Heightened startle response and irritability.",
        ),
    ),
    (
        "complex trauma",
        profile(
            "Negative self-perception and distrust.",
            "Self-destructive behaviors and difficulty with relationships.",
            "Emotional dysregulation and feelings of shame.",
        ),
    ),
    (
        "developmental trauma",
        profile(
            "Impaired cognitive development and learning difficulties.",
            "Attachment issues and behavioral problems.",
            "Chronic feelings of emptiness and emotional numbness.",
        ),
    ),
];

/// Looks up the profile of a subtype, ignoring case and repeated spaces.
pub fn symptom_profile(subtype: &str) -> Option<SymptomProfile> {
    let key = subtype
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    PROFILES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, profile)| *profile)
}
