//! Screen trait and screen identifier enum.

use std::fmt;

use esimly_core::Role;

/// Identifies each primary TUI screen, navigable by number keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    /// Sign-in form -- not in the tab bar; every unauthenticated route
    /// lands here.
    #[default]
    Login,
    Shop,      // 1 (BUSINESS)
    Admin,     // 2 (ADMIN)
    Stock,     // 3 (ADMIN)
    Approvals, // 4 (ADMIN)
}

impl ScreenId {
    /// All role-gated screens in tab-bar order.
    pub const ALL: [ScreenId; 4] = [Self::Shop, Self::Admin, Self::Stock, Self::Approvals];

    /// The role required to enter this screen (None: always allowed).
    pub fn required_role(self) -> Option<Role> {
        match self {
            Self::Login => None,
            Self::Shop => Some(Role::Business),
            Self::Admin | Self::Stock | Self::Approvals => Some(Role::Admin),
        }
    }

    /// Screen from a numeric key (1-4).
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Shop),
            2 => Some(Self::Admin),
            3 => Some(Self::Stock),
            4 => Some(Self::Approvals),
            _ => None,
        }
    }

    /// The landing screen for a signed-in role.
    pub fn home_for(role: Role) -> Self {
        match role {
            Role::Admin => Self::Admin,
            Role::Business => Self::Shop,
            // Personal accounts have no TUI surface beyond their profile;
            // the shop screen renders a read-only notice for them.
            Role::User => Self::Shop,
        }
    }

    /// Short label for the tab bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Shop => "Shop",
            Self::Admin => "Admin",
            Self::Stock => "Stock",
            Self::Approvals => "Approvals",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
