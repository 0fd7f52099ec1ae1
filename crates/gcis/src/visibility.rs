//! Which affordances are shown for a clearance level, admin flag and page.
//!
//! Everything here is a pure function of its inputs.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::clearance::ClearanceLevel;

/// Pages of the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    /// System overview and charter entry point.
    System,
    /// Records index.
    Records,
    /// Single record detail.
    Record,
    /// Projects index.
    Projects,
    /// Single project detail.
    Project,
    /// Divisions overview.
    Divisions,
    /// Access page with the passphrase form.
    Access,
    /// Record filing tool.
    FileRecord,
    /// Project registration tool.
    RegisterProject,
}

impl Page {
    /// Every page.
    pub const ALL: [Self; 9] = [
        Self::System,
        Self::Records,
        Self::Record,
        Self::Projects,
        Self::Project,
        Self::Divisions,
        Self::Access,
        Self::FileRecord,
        Self::RegisterProject,
    ];

    /// Document name of the page.
    #[must_use]
    pub fn href(self) -> &'static str {
        match self {
            Self::System => "system.html",
            Self::Records => "records.html",
            Self::Record => "record.html",
            Self::Projects => "projects.html",
            Self::Project => "project.html",
            Self::Divisions => "divisions.html",
            Self::Access => "access.html",
            Self::FileRecord => "file-record.html",
            Self::RegisterProject => "register-project.html",
        }
    }

    /// Short name used on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.href().trim_end_matches(".html")
    }

    /// Resolve a page from a path ending in its document name.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|page| {
            path == page.href() || path.ends_with(&format!("/{}", page.href()))
        })
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|page| page.name() == s)
            .or_else(|| Self::from_path(s))
            .ok_or_else(|| format!("unknown page '{s}'"))
    }
}

/// Entries of the site navigation, in display order.
pub const NAV_ENTRIES: [Page; 5] = [
    Page::System,
    Page::Records,
    Page::Projects,
    Page::Divisions,
    Page::Access,
];

/// Text of the clearance badge shown on the access page.
pub const WITNESS_BADGE: &str = "Clearance: Witness";

/// Notice shown on internal tool forms that are locked.
pub const ACCESS_RESTRICTED_NOTICE: &str = "Access restricted.";

/// Inputs to the visibility policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    /// Current clearance level.
    pub level: ClearanceLevel,
    /// Admin override flag.
    pub admin: bool,
}

impl Viewer {
    /// Create a viewer.
    #[must_use]
    pub fn new(level: ClearanceLevel, admin: bool) -> Self {
        Self { level, admin }
    }

    fn at_least(self, level: ClearanceLevel) -> bool {
        self.level.rank() >= level.rank()
    }

    /// Whether a navigation entry is shown.
    ///
    /// Public viewers only see the system and records entries, admin or not.
    #[must_use]
    pub fn shows_nav(self, entry: Page) -> bool {
        if self.level == ClearanceLevel::Public {
            return matches!(entry, Page::System | Page::Records);
        }
        if entry == Page::Divisions {
            return self.admin || self.at_least(ClearanceLevel::Authorized);
        }
        true
    }

    /// Whether the internal tool links (record filing, project
    /// registration) are shown. When hidden, the tool forms are locked.
    #[must_use]
    pub fn shows_internal_tools(self) -> bool {
        self.admin || self.at_least(ClearanceLevel::Authorized)
    }

    /// Whether the annotation section is shown.
    #[must_use]
    pub fn shows_annotations(self) -> bool {
        self.admin || self.at_least(ClearanceLevel::Witness)
    }

    /// Whether the annotation submission form is shown.
    ///
    /// This is narrower than the section: only registered non-admins lose it.
    #[must_use]
    pub fn shows_annotation_form(self) -> bool {
        self.admin || self.level != ClearanceLevel::Registered
    }

    /// Clearance badge for `page`, if any.
    #[must_use]
    pub fn badge(self, page: Page) -> Option<&'static str> {
        (page == Page::Access && self.level == ClearanceLevel::Witness).then_some(WITNESS_BADGE)
    }

    /// Full set of decisions for `page`.
    #[must_use]
    pub fn visibility(self, page: Page) -> Visibility {
        let internal_tools = self.shows_internal_tools();
        Visibility {
            page,
            nav: NAV_ENTRIES
                .into_iter()
                .map(|entry| NavVisibility {
                    entry,
                    visible: self.shows_nav(entry),
                })
                .collect(),
            internal_tools,
            forms_locked: !internal_tools,
            annotations: self.shows_annotations(),
            annotation_form: self.shows_annotation_form(),
            badge: self.badge(page),
        }
    }
}

/// Visibility of one navigation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavVisibility {
    /// The entry.
    pub entry: Page,
    /// Whether it is shown.
    pub visible: bool,
}

/// All show/hide decisions for one page render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Visibility {
    /// Page the decisions were made for.
    pub page: Page,
    /// Navigation entries in display order.
    pub nav: Vec<NavVisibility>,
    /// Internal tool links.
    pub internal_tools: bool,
    /// Record filing and project registration forms are disabled.
    pub forms_locked: bool,
    /// Annotation section.
    pub annotations: bool,
    /// Annotation submission form.
    pub annotation_form: bool,
    /// Clearance badge text.
    pub badge: Option<&'static str>,
}

impl Visibility {
    /// Navigation entries that are shown.
    pub fn visible_nav(&self) -> impl Iterator<Item = Page> + '_ {
        self.nav
            .iter()
            .filter(|nav| nav.visible)
            .map(|nav| nav.entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ClearanceLevel::{Authorized, Public, Registered, Restricted, Witness};

    fn viewer(level: ClearanceLevel) -> Viewer {
        Viewer::new(level, false)
    }

    #[test]
    fn test_public_sees_two_nav_entries() {
        for admin in [false, true] {
            let visibility = Viewer::new(Public, admin).visibility(Page::Records);
            let visible: Vec<Page> = visibility.visible_nav().collect();
            assert_eq!(visible, vec![Page::System, Page::Records]);
        }
    }

    #[test]
    fn test_divisions_requires_authorized_or_admin() {
        assert!(!viewer(Registered).shows_nav(Page::Divisions));
        assert!(!viewer(Witness).shows_nav(Page::Divisions));
        assert!(viewer(Authorized).shows_nav(Page::Divisions));
        assert!(viewer(Restricted).shows_nav(Page::Divisions));
        assert!(Viewer::new(Witness, true).shows_nav(Page::Divisions));
    }

    #[test]
    fn test_registered_sees_other_nav_entries() {
        let v = viewer(Registered);
        assert!(v.shows_nav(Page::Projects));
        assert!(v.shows_nav(Page::Access));
        assert!(v.shows_nav(Page::System));
    }

    #[test]
    fn test_annotation_section() {
        assert!(!viewer(Public).shows_annotations());
        assert!(!viewer(Registered).shows_annotations());
        assert!(viewer(Witness).shows_annotations());
        assert!(viewer(Restricted).shows_annotations());
        assert!(Viewer::new(Public, true).shows_annotations());
    }

    #[test]
    fn test_annotation_form_hidden_only_for_registered() {
        assert!(!viewer(Registered).shows_annotation_form());
        assert!(Viewer::new(Registered, true).shows_annotation_form());
        for level in [Public, Witness, Authorized, Restricted] {
            assert!(viewer(level).shows_annotation_form(), "{level}");
        }
    }

    #[test]
    fn test_internal_tools() {
        assert!(!viewer(Witness).shows_internal_tools());
        assert!(viewer(Authorized).shows_internal_tools());
        assert!(Viewer::new(Public, true).shows_internal_tools());

        let locked = viewer(Registered).visibility(Page::FileRecord);
        assert!(locked.forms_locked);
        assert!(!locked.internal_tools);
    }

    #[test]
    fn test_badge_only_on_access_at_witness() {
        assert_eq!(viewer(Witness).badge(Page::Access), Some(WITNESS_BADGE));
        assert_eq!(viewer(Witness).badge(Page::Records), None);
        assert_eq!(viewer(Authorized).badge(Page::Access), None);
        assert_eq!(Viewer::new(Registered, true).badge(Page::Access), None);
    }

    #[test]
    fn test_page_parsing() {
        assert_eq!("record".parse::<Page>(), Ok(Page::Record));
        assert_eq!("file-record".parse::<Page>(), Ok(Page::FileRecord));
        assert_eq!("/site/access.html".parse::<Page>(), Ok(Page::Access));
        assert!("index".parse::<Page>().is_err());
        assert_eq!(Page::from_path("/a/preaccess.html"), None);
    }
}
