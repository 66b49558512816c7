//! The fixed roster of advisory roles and the synthesis role.
//!
//! Each role is a static [`RoleSpec`]: which templates it reads, which parts
//! of the day's context it sees, and what its answers look like. Adding a
//! role means adding a variant and a descriptor, nothing else.

use crate::parse::{ListField, ResponseShape};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Strategy,
    Ethics,
    Wellness,
    Product,
    Engineering,
    Marketing,
    ChiefOfStaff,
}

/// Which optional context a role's prompts include. The pulse is always in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextScope {
    pub memo: bool,
    pub history: bool,
    pub company_summary: bool,
}

impl ContextScope {
    pub const PULSE_ONLY: Self = Self {
        memo: false,
        history: false,
        company_summary: false,
    };
    pub const WITH_MEMO: Self = Self {
        memo: true,
        history: false,
        company_summary: false,
    };
    pub const FULL: Self = Self {
        memo: true,
        history: true,
        company_summary: true,
    };
}

#[derive(Debug, Clone, Copy)]
pub struct RoleSpec {
    pub role: Role,
    /// What the opening brief should concentrate on.
    pub brief_focus: &'static str,
    /// What a follow-up reply should offer.
    pub reply_focus: &'static str,
    pub scope: ContextScope,
    pub shape: ResponseShape,
}

const ALL_LISTS: &[ListField] = &ListField::ALL;

const STRATEGY: RoleSpec = RoleSpec {
    role: Role::Strategy,
    brief_focus: "alignment between today's goal and the longer-term direction, trade-offs and sequencing",
    reply_focus: "a relevant strategic insight or clarification",
    scope: ContextScope::FULL,
    shape: ResponseShape {
        agent: "strategy",
        list_fields: ALL_LISTS,
        bullet_field: ListField::Recommendations,
        text_fields: &["assessment"],
    },
};

const ETHICS: RoleSpec = RoleSpec {
    role: Role::Ethics,
    brief_focus: "potential ethical considerations, value alignment, or risks",
    reply_focus: "a relevant ethical reflection or clarification",
    scope: ContextScope::WITH_MEMO,
    shape: ResponseShape {
        agent: "ethics",
        list_fields: ALL_LISTS,
        bullet_field: ListField::Concerns,
        text_fields: &[],
    },
};

const WELLNESS: RoleSpec = RoleSpec {
    role: Role::Wellness,
    brief_focus: "acknowledging their current state or potential wellness factors",
    reply_focus: "a relevant wellness observation, tip, or encouragement",
    scope: ContextScope::PULSE_ONLY,
    shape: ResponseShape {
        agent: "wellness",
        list_fields: &[ListField::Recommendations, ListField::Concerns],
        bullet_field: ListField::Recommendations,
        text_fields: &["observation"],
    },
};

const PRODUCT: RoleSpec = RoleSpec {
    role: Role::Product,
    brief_focus: "user value, recurring feedback themes, and scope decisions",
    reply_focus: "a relevant product insight or clarification",
    scope: ContextScope::WITH_MEMO,
    shape: ResponseShape {
        agent: "product",
        list_fields: ALL_LISTS,
        bullet_field: ListField::Recommendations,
        text_fields: &[],
    },
};

const ENGINEERING: RoleSpec = RoleSpec {
    role: Role::Engineering,
    brief_focus: "potential technical debt, performance issues, blockers, or relevant engineering practices",
    reply_focus: "a relevant technical insight or clarification",
    scope: ContextScope::WITH_MEMO,
    shape: ResponseShape {
        agent: "engineering",
        list_fields: ALL_LISTS,
        bullet_field: ListField::Flags,
        text_fields: &["assessment"],
    },
};

const MARKETING: RoleSpec = RoleSpec {
    role: Role::Marketing,
    brief_focus: "positioning, messaging, and growth opportunities",
    reply_focus: "a relevant marketing insight or clarification",
    scope: ContextScope::WITH_MEMO,
    shape: ResponseShape {
        agent: "marketing",
        list_fields: ALL_LISTS,
        bullet_field: ListField::Recommendations,
        text_fields: &[],
    },
};

const CHIEF_OF_STAFF: RoleSpec = RoleSpec {
    role: Role::ChiefOfStaff,
    brief_focus: "a prioritized directive for the day",
    reply_focus: "a revised directive",
    scope: ContextScope::FULL,
    shape: ResponseShape {
        agent: "chiefOfStaff",
        list_fields: ALL_LISTS,
        bullet_field: ListField::Recommendations,
        text_fields: &[],
    },
};

impl Role {
    /// Advisory roles in run order.
    pub const ADVISORS: [Role; 6] = [
        Role::Strategy,
        Role::Ethics,
        Role::Wellness,
        Role::Product,
        Role::Engineering,
        Role::Marketing,
    ];

    /// Every role, synthesis last.
    pub const ALL: [Role; 7] = [
        Role::Strategy,
        Role::Ethics,
        Role::Wellness,
        Role::Product,
        Role::Engineering,
        Role::Marketing,
        Role::ChiefOfStaff,
    ];

    pub fn spec(self) -> &'static RoleSpec {
        match self {
            Role::Strategy => &STRATEGY,
            Role::Ethics => &ETHICS,
            Role::Wellness => &WELLNESS,
            Role::Product => &PRODUCT,
            Role::Engineering => &ENGINEERING,
            Role::Marketing => &MARKETING,
            Role::ChiefOfStaff => &CHIEF_OF_STAFF,
        }
    }

    /// Key used in `config/agents.json`, template names and output records.
    pub fn key(self) -> &'static str {
        self.spec().shape.agent
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Role::Strategy => "Strategy",
            Role::Ethics => "Ethics",
            Role::Wellness => "Wellness",
            Role::Product => "Product",
            Role::Engineering => "Engineering",
            Role::Marketing => "Marketing",
            Role::ChiefOfStaff => "Chief of Staff",
        }
    }

    pub fn is_synthesis(self) -> bool {
        self == Role::ChiefOfStaff
    }

    pub fn brief_template(self) -> String {
        format!("{}BriefPrompt.txt", self.key())
    }

    pub fn reply_template(self) -> String {
        format!("{}ReplyPrompt.txt", self.key())
    }

    /// Single-shot template: batch analysis for advisors, the synthesis prompt
    /// for the chief of staff.
    pub fn analysis_template(self) -> String {
        format!("{}Prompt.txt", self.key())
    }

    /// Look a role up by key, ignoring case, `_` and `-`.
    pub fn from_key(key: &str) -> Option<Role> {
        let wanted = normalize_key(key);
        Role::ALL
            .into_iter()
            .find(|role| normalize_key(role.key()) == wanted)
    }
}

/// `chief_of_staff`, `Chief-Of-Staff` and `chiefOfStaff` all normalize alike.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::from_key(s).ok_or_else(|| {
            let known: Vec<&str> = Role::ALL.iter().map(|r| r.key()).collect();
            format!("unknown role '{s}'; expected one of: {}", known.join(", "))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_and_templates() {
        assert_eq!(Role::ChiefOfStaff.key(), "chiefOfStaff");
        assert_eq!(Role::Ethics.brief_template(), "ethicsBriefPrompt.txt");
        assert_eq!(Role::Wellness.reply_template(), "wellnessReplyPrompt.txt");
        assert_eq!(Role::ChiefOfStaff.analysis_template(), "chiefOfStaffPrompt.txt");
    }

    #[test]
    fn from_key_is_forgiving() {
        for key in ["chiefOfStaff", "chief_of_staff", "Chief-Of-Staff", "CHIEFOFSTAFF"] {
            assert_eq!(Role::from_key(key), Some(Role::ChiefOfStaff));
        }
        assert_eq!("Engineering".parse::<Role>(), Ok(Role::Engineering));
        assert!("creativeDirector".parse::<Role>().is_err());
    }

    #[test]
    fn advisors_exclude_synthesis_and_keep_order() {
        assert!(Role::ADVISORS.iter().all(|r| !r.is_synthesis()));
        assert_eq!(&Role::ALL[..6], &Role::ADVISORS);
        assert_eq!(Role::ALL[6], Role::ChiefOfStaff);
    }

    #[test]
    fn context_scopes() {
        assert_eq!(Role::Wellness.spec().scope, ContextScope::PULSE_ONLY);
        assert_eq!(Role::Strategy.spec().scope, ContextScope::FULL);
        assert!(Role::Ethics.spec().scope.memo);
        assert!(!Role::Ethics.spec().scope.history);
    }

    #[test]
    fn shape_agent_matches_key_for_every_role() {
        for role in Role::ALL {
            assert_eq!(role.spec().role, role);
            assert_eq!(role.spec().shape.agent, role.key());
        }
    }

    #[test]
    fn serializes_as_key() {
        assert_eq!(
            serde_json::to_string(&Role::ChiefOfStaff).unwrap(),
            "\"chiefOfStaff\""
        );
    }
}
