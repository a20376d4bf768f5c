/**
 * Request Validators
 * Declarative field checks that run before the controllers, plus the shared
 * regexes and enum constants backing the project and blog payload checks.
 */
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::models::{NewBlogPost, NewContact, NewProject};
use crate::routes::{ApiError, FieldError};

// ============================================================================
// Shared patterns and enums
// ============================================================================

lazy_static! {
    /// Valid slug pattern: lowercase letters, numbers, and hyphens
    static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();

    /// Well-formed email: one @, no whitespace, dotted domain
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();

    /// Link fields must be absolute http(s) URLs when present
    static ref URL_REGEX: Regex = Regex::new(r"^https?://.+").unwrap();
}

pub const PROJECT_CATEGORIES: &[&str] =
    &["Frontend", "Backend", "Full Stack", "Mobile", "Other"];

pub const PROJECT_STATUSES: &[&str] = &["completed", "in-progress", "archived"];

pub const BLOG_CATEGORIES: &[&str] = &[
    "Web Development",
    "MERN Stack",
    "Tutorial",
    "Tips & Tricks",
    "Career",
    "Other",
];

pub const CONTACT_STATUSES: &[&str] = &["new", "read", "responded"];

pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_REGEX.is_match(slug)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

fn is_valid_url(url: &str) -> bool {
    URL_REGEX.is_match(url)
}

/// Parse a path segment as a resource id. Malformed ids name no resource,
/// so callers map None to NotFound rather than a 400.
pub fn parse_uuid(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}

/// Derive a lowercase, hyphenated, URL-safe slug from a title.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_hyphen = false;
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

// ============================================================================
// Contact form
// ============================================================================

/// Raw contact form payload, validated before the controller runs.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub subject: Option<String>,
    #[serde(default)]
    pub message: String,
}

const MAX_CONTACT_NAME: usize = 100;
const MAX_CONTACT_SUBJECT: usize = 200;
const MAX_CONTACT_MESSAGE: usize = 1000;

/// Check every field and report all violations at once; the controller is
/// never invoked when any field fails.
pub fn validate_contact(form: &ContactForm) -> Result<NewContact, ApiError> {
    let mut errors = Vec::new();

    let name = form.name.trim();
    if name.is_empty() {
        errors.push(FieldError {
            field: "name",
            message: "Name is required".to_string(),
        });
    } else if name.chars().count() > MAX_CONTACT_NAME {
        errors.push(FieldError {
            field: "name",
            message: format!("Name cannot exceed {} characters", MAX_CONTACT_NAME),
        });
    }

    let email = form.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        errors.push(FieldError {
            field: "email",
            message: "Valid email is required".to_string(),
        });
    }

    let message = form.message.trim();
    if message.is_empty() {
        errors.push(FieldError {
            field: "message",
            message: "Message is required".to_string(),
        });
    } else if message.chars().count() > MAX_CONTACT_MESSAGE {
        errors.push(FieldError {
            field: "message",
            message: format!("Message cannot exceed {} characters", MAX_CONTACT_MESSAGE),
        });
    }

    let subject = form.subject.as_deref().map(str::trim);
    if let Some(subject) = subject {
        if subject.chars().count() > MAX_CONTACT_SUBJECT {
            errors.push(FieldError {
                field: "subject",
                message: format!("Subject cannot exceed {} characters", MAX_CONTACT_SUBJECT),
            });
        }
    }

    if !errors.is_empty() {
        return Err(ApiError::Fields(errors));
    }

    Ok(NewContact {
        name: name.to_string(),
        email,
        subject: subject.filter(|s| !s.is_empty()).map(str::to_string),
        message: message.to_string(),
        ip_address: None,
        user_agent: None,
    })
}

// ============================================================================
// Project payloads
// ============================================================================

const MAX_PROJECT_TITLE: usize = 100;
const MAX_PROJECT_DESCRIPTION: usize = 500;
const MAX_PROJECT_DETAILED: usize = 2000;
const MAX_PROJECT_PROSE: usize = 1000;

/// Schema checks applied to creates and to the merged field set on updates.
pub fn validate_project(project: &NewProject) -> Result<(), ApiError> {
    let title = project.title.trim();
    if title.is_empty() {
        return Err(ApiError::Validation("Project title is required".to_string()));
    }
    if title.chars().count() > MAX_PROJECT_TITLE {
        return Err(ApiError::Validation(format!(
            "Title cannot exceed {} characters",
            MAX_PROJECT_TITLE
        )));
    }
    if project.description.trim().is_empty() {
        return Err(ApiError::Validation(
            "Project description is required".to_string(),
        ));
    }
    if project.description.chars().count() > MAX_PROJECT_DESCRIPTION {
        return Err(ApiError::Validation(format!(
            "Description cannot exceed {} characters",
            MAX_PROJECT_DESCRIPTION
        )));
    }
    if project.detailed_description.trim().is_empty() {
        return Err(ApiError::Validation(
            "Detailed description is required".to_string(),
        ));
    }
    if project.detailed_description.chars().count() > MAX_PROJECT_DETAILED {
        return Err(ApiError::Validation(format!(
            "Detailed description cannot exceed {} characters",
            MAX_PROJECT_DETAILED
        )));
    }
    if project.technologies.is_empty() || project.technologies.iter().any(|t| t.trim().is_empty())
    {
        return Err(ApiError::Validation(
            "Technologies must be a non-empty list of names".to_string(),
        ));
    }
    if !PROJECT_CATEGORIES.contains(&project.category.as_str()) {
        return Err(ApiError::Validation(format!(
            "Invalid category. Valid categories: {:?}",
            PROJECT_CATEGORIES
        )));
    }
    if !PROJECT_STATUSES.contains(&project.status.as_str()) {
        return Err(ApiError::Validation(format!(
            "Invalid status. Valid statuses: {:?}",
            PROJECT_STATUSES
        )));
    }
    for url in [&project.live_url, &project.github_url].into_iter().flatten() {
        if !is_valid_url(url) {
            return Err(ApiError::Validation(
                "Please provide a valid URL".to_string(),
            ));
        }
    }
    for prose in [&project.challenges, &project.solutions].into_iter().flatten() {
        if prose.chars().count() > MAX_PROJECT_PROSE {
            return Err(ApiError::Validation(format!(
                "Challenges and solutions cannot exceed {} characters",
                MAX_PROJECT_PROSE
            )));
        }
    }
    Ok(())
}

// ============================================================================
// Blog payloads
// ============================================================================

const MAX_BLOG_TITLE: usize = 200;
const MAX_BLOG_EXCERPT: usize = 300;

/// Schema checks for blog posts; `slug` is the derived/normalized slug the
/// handler will persist.
pub fn validate_blog_post(slug: &str, post: &NewBlogPost) -> Result<(), ApiError> {
    let title = post.title.trim();
    if title.is_empty() {
        return Err(ApiError::Validation("Blog title is required".to_string()));
    }
    if title.chars().count() > MAX_BLOG_TITLE {
        return Err(ApiError::Validation(format!(
            "Title cannot exceed {} characters",
            MAX_BLOG_TITLE
        )));
    }
    if !is_valid_slug(slug) {
        return Err(ApiError::Validation(
            "Slug must contain only lowercase letters, numbers, and hyphens".to_string(),
        ));
    }
    if post.excerpt.trim().is_empty() {
        return Err(ApiError::Validation("Excerpt is required".to_string()));
    }
    if post.excerpt.chars().count() > MAX_BLOG_EXCERPT {
        return Err(ApiError::Validation(format!(
            "Excerpt cannot exceed {} characters",
            MAX_BLOG_EXCERPT
        )));
    }
    if post.content.trim().is_empty() {
        return Err(ApiError::Validation("Content is required".to_string()));
    }
    if !BLOG_CATEGORIES.contains(&post.category.as_str()) {
        return Err(ApiError::Validation(format!(
            "Invalid category. Valid categories: {:?}",
            BLOG_CATEGORIES
        )));
    }
    if post.read_time < 0 {
        return Err(ApiError::Validation(
            "Read time cannot be negative".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: &str, email: &str, subject: Option<&str>, message: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            email: email.to_string(),
            subject: subject.map(str::to_string),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_slugify_derives_url_safe_slugs() {
        assert_eq!(
            slugify("Getting Started with MERN Stack Development"),
            "getting-started-with-mern-stack-development"
        );
        assert_eq!(slugify("  Rust & Axum: a tour!  "), "rust-axum-a-tour");
        assert_eq!(slugify("Top 10 Tips"), "top-10-tips");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slug_regex_accepts_hyphenated_lowercase() {
        assert!(is_valid_slug("getting-started-mern-stack"));
        assert!(is_valid_slug("top-10-tips"));
        assert!(!is_valid_slug("Has-Capitals"));
        assert!(!is_valid_slug("trailing-"));
        assert!(!is_valid_slug("double--hyphen"));
        assert!(!is_valid_slug(""));
    }

    #[test]
    fn test_email_regex_rejects_malformed_addresses() {
        assert!(is_valid_email("dev@example.com"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("no-domain@host"));
    }

    #[test]
    fn test_contact_empty_message_reports_message_field() {
        let err = validate_contact(&contact("Ada", "ada@example.com", None, "")).unwrap_err();
        match err {
            ApiError::Fields(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "message");
            }
            other => panic!("expected Fields error, got {:?}", other),
        }
    }

    #[test]
    fn test_contact_reports_each_offending_field() {
        let long_subject = "s".repeat(201);
        let err =
            validate_contact(&contact("", "bad-email", Some(&long_subject), "")).unwrap_err();
        match err {
            ApiError::Fields(errors) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, vec!["name", "email", "message", "subject"]);
            }
            other => panic!("expected Fields error, got {:?}", other),
        }
    }

    #[test]
    fn test_contact_normalizes_email_and_trims_fields() {
        let clean = validate_contact(&contact(
            "  Ada Lovelace  ",
            "  Ada@Example.COM ",
            Some("  Hello  "),
            "  A message.  ",
        ))
        .unwrap();
        assert_eq!(clean.name, "Ada Lovelace");
        assert_eq!(clean.email, "ada@example.com");
        assert_eq!(clean.subject.as_deref(), Some("Hello"));
        assert_eq!(clean.message, "A message.");
    }

    #[test]
    fn test_contact_blank_subject_becomes_none() {
        let clean =
            validate_contact(&contact("Ada", "ada@example.com", Some("   "), "Hi")).unwrap();
        assert!(clean.subject.is_none());
    }

    fn sample_project() -> NewProject {
        serde_json::from_value(serde_json::json!({
            "title": "MealMate",
            "description": "Food delivery platform",
            "detailedDescription": "Full-stack food delivery application.",
            "technologies": ["React.js", "Node.js"],
        }))
        .unwrap()
    }

    #[test]
    fn test_project_defaults_pass_validation() {
        let project = sample_project();
        assert_eq!(project.category, "Full Stack");
        assert_eq!(project.status, "completed");
        assert!(validate_project(&project).is_ok());
    }

    #[test]
    fn test_project_rejects_invalid_enum_and_url() {
        let mut project = sample_project();
        project.category = "Games".to_string();
        assert!(validate_project(&project).is_err());

        let mut project = sample_project();
        project.live_url = Some("ftp://example.com".to_string());
        assert!(validate_project(&project).is_err());

        let mut project = sample_project();
        project.live_url = Some("https://example.com".to_string());
        assert!(validate_project(&project).is_ok());
    }

    #[test]
    fn test_project_rejects_empty_technology_entries() {
        let mut project = sample_project();
        project.technologies = vec!["React.js".to_string(), "  ".to_string()];
        assert!(validate_project(&project).is_err());

        let mut project = sample_project();
        project.technologies.clear();
        assert!(validate_project(&project).is_err());
    }

    #[test]
    fn test_project_rejects_over_length_title() {
        let mut project = sample_project();
        project.title = "t".repeat(101);
        assert!(validate_project(&project).is_err());
    }

    fn sample_post() -> NewBlogPost {
        serde_json::from_value(serde_json::json!({
            "title": "Getting Started",
            "excerpt": "A short excerpt.",
            "content": "Full content.",
        }))
        .unwrap()
    }

    #[test]
    fn test_blog_post_defaults_pass_validation() {
        let post = sample_post();
        assert_eq!(post.author, "Admin");
        assert_eq!(post.read_time, 5);
        assert!(validate_blog_post("getting-started", &post).is_ok());
    }

    #[test]
    fn test_blog_post_rejects_bad_slug_and_category() {
        let post = sample_post();
        assert!(validate_blog_post("Bad Slug", &post).is_err());

        let mut post = sample_post();
        post.category = "Gossip".to_string();
        assert!(validate_blog_post("getting-started", &post).is_err());
    }

    #[test]
    fn test_parse_uuid_rejects_malformed_ids() {
        assert!(parse_uuid("not-a-uuid").is_none());
        assert!(parse_uuid("3fa85f64-5717-4562-b3fc-2c963f66afa6").is_some());
    }
}
