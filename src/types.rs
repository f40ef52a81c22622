use serde::Serialize;

/// Descriptive data about the site owner, plus how many items of each
/// collection the home page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Site {
    pub name: &'static str,
    pub email: &'static str,
    pub num_posts_on_homepage: usize,
    pub num_works_on_homepage: usize,
    pub num_projects_on_homepage: usize
}

/// Display title and document description for one logical page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub title: &'static str,
    pub description: &'static str
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Social {
    pub name: &'static str,
    pub href: &'static str
}

/// Ordered by display position.
pub type Socials = &'static [Social];
