use crate::types::{Metadata, Site, Social, Socials};

pub const SITE: Site = Site {
    name: "@rustaceanrob",
    email: "rob@2140.dev",
    num_posts_on_homepage: 1,
    num_works_on_homepage: 2,
    num_projects_on_homepage: 3
};

pub const HOME: Metadata = Metadata {
    title: "Home",
    description: "The home page to view all my work."
};

pub const BLOG: Metadata = Metadata {
    title: "Blog",
    description: "A collection of articles on topics I am passionate about."
};

pub const WORK: Metadata = Metadata {
    title: "Work",
    description: "Where I have worked and what I have done."
};

pub const PROJECTS: Metadata = Metadata {
    title: "Projects",
    description: "A collection of my projects, with links to repositories and demos."
};

pub const SOCIALS: Socials = &[
    Social {
        name: "github",
        href: "https://github.com/rustaceanrob"
    },
    Social {
        name: "linkedin",
        href: "https://www.linkedin.com/in/robnetzke"
    }
];
