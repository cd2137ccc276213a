//! Fixed emergency catalogs.

/// Public emergency number dialed from the critical alert.
pub const EMERGENCY_NUMBER: &str = "112";

/// One binary screening question. A "yes" means call for help now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriageQuestion {
    pub id: &'static str,
    pub text: &'static str,
}

/// Screening questions in the order they are asked.
pub const TRIAGE_QUESTIONS: [TriageQuestion; 5] = [
    TriageQuestion {
        id: "chest",
        text: "Is there severe chest pain or pressure?",
    },
    TriageQuestion {
        id: "breath",
        text: "Is there difficulty breathing or gasping?",
    },
    TriageQuestion {
        id: "bleed",
        text: "Is there uncontrollable bleeding?",
    },
    TriageQuestion {
        id: "unconscious",
        text: "Is the person unconscious or unresponsive?",
    },
    TriageQuestion {
        id: "stroke",
        text: "Signs of Stroke (Face drooping, Arm weakness, Speech)?",
    },
];

/// An emergency with a quick first-aid guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonEmergency {
    pub id: &'static str,
    /// Name sent to the oracle when requesting the guide.
    pub name: &'static str,
}

pub const COMMON_EMERGENCIES: [CommonEmergency; 6] = [
    CommonEmergency {
        id: "cpr",
        name: "CPR (Adult)",
    },
    CommonEmergency {
        id: "choking",
        name: "Choking / Heimlich",
    },
    CommonEmergency {
        id: "bleeding",
        name: "Severe Bleeding",
    },
    CommonEmergency {
        id: "burns",
        name: "Burns",
    },
    CommonEmergency {
        id: "seizure",
        name: "Seizure",
    },
    CommonEmergency {
        id: "allergic",
        name: "Allergic Reaction",
    },
];

/// Looks up a catalog entry by id or name, ignoring case.
pub fn find_emergency(key: &str) -> Option<&'static CommonEmergency> {
    let key = key.trim();
    COMMON_EMERGENCIES
        .iter()
        .find(|e| e.id.eq_ignore_ascii_case(key) || e.name.eq_ignore_ascii_case(key))
}
