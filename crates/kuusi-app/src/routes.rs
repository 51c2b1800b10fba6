//! Route table and classification
//!
//! Every location the session core reasons about is either [`Public`]
//! (reachable without a verified identity) or [`AuthOnly`]. A path that no
//! screen claims is [`Unclassified`]; callers treat it as auth-only.
//!
//! [`Public`]: RouteClass::Public
//! [`AuthOnly`]: RouteClass::AuthOnly
//! [`Unclassified`]: RouteClass::Unclassified

use kuusi_core::{GroupId, Location};
use std::fmt;

/// Access class of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteClass {
    /// Reachable while signed out or unverified
    Public,
    /// Requires a verified identity
    AuthOnly,
    /// Not registered in the route table
    Unclassified,
}

impl RouteClass {
    /// Whether a verified identity is required. Unclassified fails closed.
    pub fn requires_verified(self) -> bool {
        !matches!(self, Self::Public)
    }
}

impl fmt::Display for RouteClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Public => "public",
            Self::AuthOnly => "auth-only",
            Self::Unclassified => "unclassified",
        })
    }
}

/// Pages under `/user`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserPage {
    /// `/user`
    Settings,
    /// `/user/create-group`
    CreateGroup,
    /// `/user/edit-group`
    EditGroup,
    /// `/user/join-group`
    JoinGroup,
    /// `/user/change-email`
    ChangeEmail,
    /// `/user/change-password`
    ChangePassword,
    /// `/user/hashtags`
    Hashtags,
    /// `/user/edit-profile-icon`
    EditProfileIcon,
}

impl UserPage {
    const ALL: [UserPage; 7] = [
        Self::CreateGroup,
        Self::EditGroup,
        Self::JoinGroup,
        Self::ChangeEmail,
        Self::ChangePassword,
        Self::Hashtags,
        Self::EditProfileIcon,
    ];

    fn slug(self) -> Option<&'static str> {
        match self {
            Self::Settings => None,
            Self::CreateGroup => Some("create-group"),
            Self::EditGroup => Some("edit-group"),
            Self::JoinGroup => Some("join-group"),
            Self::ChangeEmail => Some("change-email"),
            Self::ChangePassword => Some("change-password"),
            Self::Hashtags => Some("hashtags"),
            Self::EditProfileIcon => Some("edit-profile-icon"),
        }
    }

    fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|page| page.slug() == Some(slug))
    }
}

/// A registered screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Screen {
    /// `/`: shows the splash, then redirects
    Splash,
    /// `/invite`: invitation code entry
    Invite,
    /// `/auth`: sign in / sign up
    Auth,
    /// `/verify-email`: waits for email confirmation
    VerifyEmail,
    /// `/group/join/:groupId`: invitation link landing
    GroupJoin(GroupId),
    /// `/home`: the feed
    Home,
    /// `/gallery`
    Gallery,
    /// `/upload`
    Upload,
    /// `/post`
    Post,
    /// `/browse-by-year`
    BrowseByYear,
    /// `/notifications`
    Notifications,
    /// `/user` and its subpages
    User(UserPage),
}

impl Screen {
    /// Map a location to the screen that renders it.
    pub fn recognize(location: &Location) -> Option<Self> {
        let segments: Vec<&str> = location.segments().collect();
        let screen = match segments.as_slice() {
            [] => Self::Splash,
            ["invite"] => Self::Invite,
            ["auth"] => Self::Auth,
            ["verify-email"] => Self::VerifyEmail,
            ["group", "join", id] => Self::GroupJoin(GroupId::parse(id)?),
            ["home"] => Self::Home,
            ["gallery"] => Self::Gallery,
            ["upload"] => Self::Upload,
            ["post"] => Self::Post,
            ["browse-by-year"] => Self::BrowseByYear,
            ["notifications"] => Self::Notifications,
            ["user"] => Self::User(UserPage::Settings),
            ["user", slug] => Self::User(UserPage::from_slug(slug)?),
            _ => return None,
        };
        Some(screen)
    }

    /// Access class of this screen
    pub fn class(&self) -> RouteClass {
        match self {
            Self::Splash | Self::Invite | Self::Auth | Self::VerifyEmail | Self::GroupJoin(_) => {
                RouteClass::Public
            }
            Self::Home
            | Self::Gallery
            | Self::Upload
            | Self::Post
            | Self::BrowseByYear
            | Self::Notifications
            | Self::User(_) => RouteClass::AuthOnly,
        }
    }

    /// Canonical path
    pub fn path(&self) -> String {
        match self {
            Self::Splash => "/".to_string(),
            Self::Invite => "/invite".to_string(),
            Self::Auth => "/auth".to_string(),
            Self::VerifyEmail => "/verify-email".to_string(),
            Self::GroupJoin(id) => format!("/group/join/{id}"),
            Self::Home => "/home".to_string(),
            Self::Gallery => "/gallery".to_string(),
            Self::Upload => "/upload".to_string(),
            Self::Post => "/post".to_string(),
            Self::BrowseByYear => "/browse-by-year".to_string(),
            Self::Notifications => "/notifications".to_string(),
            Self::User(page) => match page.slug() {
                Some(slug) => format!("/user/{slug}"),
                None => "/user".to_string(),
            },
        }
    }

    /// Canonical location
    pub fn location(&self) -> Location {
        Location::new(&self.path())
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Classify a location.
///
/// Unknown pages under `/user` are auth-only as a family; anything else the
/// route table does not know is [`RouteClass::Unclassified`].
pub fn classify(location: &Location) -> RouteClass {
    if let Some(screen) = Screen::recognize(location) {
        return screen.class();
    }
    if location.segments().next() == Some("user") {
        return RouteClass::AuthOnly;
    }
    RouteClass::Unclassified
}

/// Classify for access decisions, failing closed on unregistered paths.
pub(crate) fn effective_class(location: &Location) -> RouteClass {
    let class = classify(location);
    if class == RouteClass::Unclassified {
        tracing::warn!(location = %location, "Unclassified route; treating as auth-only");
    }
    if class.requires_verified() {
        RouteClass::AuthOnly
    } else {
        RouteClass::Public
    }
}

/// The screen a group-join intent lands the user on.
pub fn group_edit_screen() -> Screen {
    Screen::User(UserPage::EditGroup)
}
