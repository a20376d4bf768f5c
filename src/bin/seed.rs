//! Seed the database with sample projects and blog posts.
//!
//! Idempotent: blog posts are keyed by slug and projects by title, so
//! re-running never duplicates rows.
//!
//! Usage: cargo run --bin seed

use portfolio_api::db;
use sqlx::PgPool;

struct SeedProject {
    title: &'static str,
    description: &'static str,
    detailed_description: &'static str,
    technologies: &'static [&'static str],
    category: &'static str,
    image_url: &'static str,
    live_url: &'static str,
    github_url: &'static str,
    features: &'static [&'static str],
    challenges: &'static str,
    solutions: &'static str,
    display_order: i32,
    featured: bool,
    status: &'static str,
}

struct SeedPost {
    title: &'static str,
    slug: &'static str,
    excerpt: &'static str,
    content: &'static str,
    author: &'static str,
    cover_image: &'static str,
    tags: &'static [&'static str],
    category: &'static str,
    published: bool,
    read_time: i32,
}

const PROJECTS: &[SeedProject] = &[
    SeedProject {
        title: "MealMate - Food Delivery App",
        description:
            "Full-stack food delivery platform with real-time order tracking and payment integration",
        detailed_description:
            "MealMate is a comprehensive food delivery application. Features include real-time \
             order tracking, payment integration, a restaurant management dashboard, and \
             optimized queries for fast performance.",
        technologies: &[
            "React.js",
            "Node.js",
            "Express.js",
            "MongoDB",
            "Socket.io",
            "Stripe",
            "Redux",
            "TailwindCSS",
        ],
        category: "Full Stack",
        image_url: "https://images.unsplash.com/photo-1504674900247-0877df9cc836",
        live_url: "https://mealmate-demo.com",
        github_url: "https://github.com/yourusername/mealmate",
        features: &[
            "Real-time order tracking with Socket.io",
            "Secure payment processing with Stripe",
            "Restaurant dashboard for order management",
            "User authentication with JWT",
            "Optimized database queries for performance",
        ],
        challenges:
            "Implementing real-time updates across multiple users while maintaining performance",
        solutions:
            "Utilized Socket.io for efficient bi-directional communication and Redis caching for \
             frequently accessed data",
        display_order: 1,
        featured: true,
        status: "completed",
    },
    SeedProject {
        title: "EduTrack - Learning Management System",
        description: "Educational platform with role-based access for students and administrators",
        detailed_description:
            "EduTrack is a robust learning management system designed for educational \
             institutions. It features course management, student enrollment, progress tracking, \
             and comprehensive admin controls.",
        technologies: &[
            "React.js",
            "Node.js",
            "Express.js",
            "MongoDB",
            "JWT",
            "Material-UI",
        ],
        category: "Full Stack",
        image_url: "https://images.unsplash.com/photo-1516321318423-f06f85e504b3",
        live_url: "https://edutrack-demo.com",
        github_url: "https://github.com/yourusername/edutrack",
        features: &[
            "Role-based access control (Admin/Teacher/Student)",
            "Course creation and management",
            "Real-time progress tracking",
            "Assignment submission system",
            "Grade management dashboard",
        ],
        challenges: "Managing complex role-based permissions and ensuring data security",
        solutions:
            "Implemented middleware-based authentication and authorization with JWT tokens",
        display_order: 2,
        featured: true,
        status: "completed",
    },
];

const POSTS: &[SeedPost] = &[
    SeedPost {
        title: "Getting Started with MERN Stack Development",
        slug: "getting-started-mern-stack",
        excerpt:
            "Learn how to build full-stack applications using MongoDB, Express, React, and \
             Node.js. A comprehensive guide for beginners.",
        content:
            "# Introduction to MERN Stack\n\nThe MERN stack is one of the most popular technology \
             stacks for building modern web applications. In this guide, I'll share my experience \
             and insights on getting started with MERN development.\n\n## Why Choose MERN Stack?\n\n\
             1. **JavaScript Everywhere** - Use the same language for both frontend and backend\n\
             2. **High Performance** - React's virtual DOM and Node.js event-driven architecture\n\
             3. **Large Community** - Extensive resources, libraries, and support\n\n\
             Start with small projects, build your portfolio, and keep learning. Happy coding!",
        author: "Admin",
        cover_image: "https://images.unsplash.com/photo-1461749280684-dccba630e2f6",
        tags: &["MERN Stack", "Tutorial", "Web Development", "Beginner"],
        category: "Tutorial",
        published: true,
        read_time: 8,
    },
    SeedPost {
        title: "Top 10 Tips for Junior Developers",
        slug: "top-10-tips-junior-developers",
        excerpt:
            "Essential advice for developers starting their career in tech. Learn from real \
             experiences and avoid common pitfalls.",
        content:
            "# Top 10 Tips for Junior Developers\n\nStarting your career as a junior developer \
             can be overwhelming. Here are my top tips based on personal experience.\n\n\
             ## 1. Build Real Projects\n\nDon't just follow tutorials - build your own projects. \
             This is the best way to learn and create a portfolio that showcases your skills.\n\n\
             ## 2. Ask Questions\n\nThe community is very supportive, so don't hesitate to ask.",
        author: "Admin",
        cover_image: "https://images.unsplash.com/photo-1498050108023-c5249f4df085",
        tags: &["Career", "Tips & Tricks", "Beginner"],
        category: "Career",
        published: true,
        read_time: 6,
    },
];

async fn seed_projects(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let mut inserted = 0;
    for project in PROJECTS {
        let result = sqlx::query(
            r#"
            INSERT INTO projects (
                title, description, detailed_description, technologies, category,
                image_url, live_url, github_url, features, challenges, solutions,
                display_order, featured, status, created_at, updated_at
            )
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, now(), now()
            WHERE NOT EXISTS (SELECT 1 FROM projects WHERE title = $1)
            "#,
        )
        .bind(project.title)
        .bind(project.description)
        .bind(project.detailed_description)
        .bind(
            project
                .technologies
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>(),
        )
        .bind(project.category)
        .bind(project.image_url)
        .bind(project.live_url)
        .bind(project.github_url)
        .bind(
            project
                .features
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>(),
        )
        .bind(project.challenges)
        .bind(project.solutions)
        .bind(project.display_order)
        .bind(project.featured)
        .bind(project.status)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }
    Ok(inserted)
}

async fn seed_posts(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let mut inserted = 0;
    for post in POSTS {
        let result = sqlx::query(
            r#"
            INSERT INTO blog_posts (
                title, slug, excerpt, content, author, cover_image, tags,
                category, published, read_time, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now(), now())
            ON CONFLICT (slug) DO NOTHING
            "#,
        )
        .bind(post.title)
        .bind(post.slug)
        .bind(post.excerpt)
        .bind(post.content)
        .bind(post.author)
        .bind(post.cover_image)
        .bind(post.tags.iter().map(|s| s.to_string()).collect::<Vec<_>>())
        .bind(post.category)
        .bind(post.published)
        .bind(post.read_time)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }
    Ok(inserted)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let pool = match db::init_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = db::run_migrations(pool.as_ref()).await {
        eprintln!("Failed to run migrations: {}", e);
        std::process::exit(1);
    }

    match seed_projects(pool.as_ref()).await {
        Ok(n) => println!("Seeded {} project(s)", n),
        Err(e) => {
            eprintln!("Failed to seed projects: {}", e);
            std::process::exit(1);
        }
    }

    match seed_posts(pool.as_ref()).await {
        Ok(n) => println!("Seeded {} blog post(s)", n),
        Err(e) => {
            eprintln!("Failed to seed blog posts: {}", e);
            std::process::exit(1);
        }
    }
}
