//! Plain view models handed to the templates.

use blogwright_application::AuthoredPost;
use blogwright_core::{Identity, Page, PageLink, Pattern, Section, User};

use crate::flash::FlashMessage;

pub const PROFILE_PICS_URL: &str = "/static/profile_pics";

pub fn profile_image_url(image_file: &str) -> String {
    format!("{PROFILE_PICS_URL}/{image_file}")
}

#[derive(Debug, Clone)]
pub struct FlashView {
    pub category: &'static str,
    pub message: String,
}

impl From<FlashMessage> for FlashView {
    fn from(flash: FlashMessage) -> Self {
        Self {
            category: flash.category.as_str(),
            message: flash.message,
        }
    }
}

/// State of the navigation bar and the flash area of the layout.
#[derive(Debug, Clone, Default)]
pub struct NavContext {
    pub logged_in: bool,
    pub username: String,
    pub is_admin: bool,
    pub messages: Vec<FlashView>,
}

impl NavContext {
    pub fn new(user: Option<&Identity>, messages: Vec<FlashMessage>) -> Self {
        let messages = messages.into_iter().map(FlashView::from).collect();
        match user {
            Some(identity) => Self {
                logged_in: true,
                username: identity.username.as_str().to_owned(),
                is_admin: identity.role.is_admin(),
                messages,
            },
            None => Self {
                messages,
                ..Self::default()
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostView {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub date_posted: String,
    pub author_username: String,
    pub author_image_url: String,
}

impl From<&AuthoredPost> for PostView {
    fn from(authored: &AuthoredPost) -> Self {
        let AuthoredPost { post, author } = authored;
        Self {
            id: post.id.0,
            title: post.title.as_str().to_owned(),
            content: post.content.clone(),
            date_posted: post.date_posted.format("%Y-%m-%d").to_string(),
            author_username: author.username.as_str().to_owned(),
            author_image_url: profile_image_url(&author.image_file),
        }
    }
}

/// One pagination button. Gaps render as an ellipsis.
#[derive(Debug, Clone)]
pub struct PageLinkView {
    pub number: u32,
    pub gap: bool,
    pub current: bool,
}

impl From<PageLink> for PageLinkView {
    fn from(link: PageLink) -> Self {
        Self {
            number: link.number.unwrap_or_default(),
            gap: link.number.is_none(),
            current: link.current,
        }
    }
}

/// A page of posts plus the links to its neighbours.
#[derive(Debug, Clone)]
pub struct PostListing {
    pub posts: Vec<PostView>,
    pub links: Vec<PageLinkView>,
    pub total: u64,
}

impl From<&Page<AuthoredPost>> for PostListing {
    fn from(page: &Page<AuthoredPost>) -> Self {
        Self {
            posts: page.items.iter().map(PostView::from).collect(),
            links: page.links().into_iter().map(PageLinkView::from).collect(),
            total: page.total,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccountView {
    pub username: String,
    pub email: String,
    pub image_url: String,
}

impl From<&User> for AccountView {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.as_str().to_owned(),
            email: user.email.as_str().to_owned(),
            image_url: profile_image_url(&user.image_file),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PatternView {
    pub id: i64,
    pub title: String,
    pub content: String,
}

impl From<&Pattern> for PatternView {
    fn from(pattern: &Pattern) -> Self {
        Self {
            id: pattern.id.0,
            title: pattern.title.as_str().to_owned(),
            content: pattern.content.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SectionView {
    pub id: i64,
    pub pattern_id: i64,
    pub title: String,
    pub content: String,
}

impl From<&Section> for SectionView {
    fn from(section: &Section) -> Self {
        Self {
            id: section.id.0,
            pattern_id: section.pattern_id.0,
            title: section.title.as_str().to_owned(),
            content: section.content.clone(),
        }
    }
}
