//! Database Models - structs representing database tables (used by sqlx/serde).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User model. The password hash is carried for credential checks but never
/// serialized into a response payload.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Portfolio project model
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub detailed_description: String,
    pub technologies: Vec<String>,
    pub category: String,
    pub image_url: String,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub features: Vec<String>,
    pub challenges: Option<String>,
    pub solutions: Option<String>,
    #[serde(rename = "order")]
    pub display_order: i32,
    pub featured: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New project for creation. Optional fields take the same defaults the
/// schema applies.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub detailed_description: String,
    pub technologies: Vec<String>,
    #[serde(default = "default_project_category")]
    pub category: String,
    #[serde(default = "default_project_image")]
    pub image_url: String,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub challenges: Option<String>,
    pub solutions: Option<String>,
    #[serde(default, rename = "order")]
    pub display_order: i32,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_project_status")]
    pub status: String,
}

fn default_project_category() -> String {
    "Full Stack".to_string()
}

fn default_project_image() -> String {
    "https://via.placeholder.com/600x400".to_string()
}

fn default_project_status() -> String {
    "completed".to_string()
}

/// Project update; absent fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub detailed_description: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub features: Option<Vec<String>>,
    pub challenges: Option<String>,
    pub solutions: Option<String>,
    #[serde(rename = "order")]
    pub display_order: Option<i32>,
    pub featured: Option<bool>,
    pub status: Option<String>,
}

/// Blog post model
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub cover_image: String,
    pub tags: Vec<String>,
    pub category: String,
    pub published: bool,
    pub views: i64,
    pub read_time: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Blog post without its full content, for list views.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub author: String,
    pub cover_image: String,
    pub tags: Vec<String>,
    pub category: String,
    pub published: bool,
    pub views: i64,
    pub read_time: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New blog post for creation. The slug is derived from the title when not
/// supplied.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBlogPost {
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: String,
    pub content: String,
    #[serde(default = "default_blog_author")]
    pub author: String,
    #[serde(default = "default_blog_cover")]
    pub cover_image: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_blog_category")]
    pub category: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default = "default_read_time")]
    pub read_time: i32,
}

fn default_blog_author() -> String {
    "Admin".to_string()
}

fn default_blog_cover() -> String {
    "https://via.placeholder.com/800x400".to_string()
}

fn default_blog_category() -> String {
    "Web Development".to_string()
}

fn default_read_time() -> i32 {
    5
}

/// Blog post update; absent fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlogPost {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub cover_image: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub published: Option<bool>,
    pub read_time: Option<i32>,
}

/// Contact submission model
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Validated contact submission ready for insertion. Produced only by the
/// contact form validator.
#[derive(Debug, Clone)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}
