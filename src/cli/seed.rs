// Demo catalog seeding

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::types::internal::course::{CourseContent, CourseLesson, CourseSection, NewCourse};

fn lesson(title: &str, duration: &str, content: &str) -> CourseLesson {
    CourseLesson {
        title: title.to_string(),
        duration: duration.to_string(),
        content: content.to_string(),
    }
}

fn demo_content() -> CourseContent {
    CourseContent {
        sections: vec![
            CourseSection {
                title: "Introduction".to_string(),
                lessons: vec![
                    lesson(
                        "Course Overview",
                        "10:15",
                        "Welcome to the course! In this lesson, we'll cover what to expect.",
                    ),
                    lesson(
                        "Setting Up Your Environment",
                        "15:30",
                        "Let's set up all the tools you'll need for this course.",
                    ),
                ],
            },
            CourseSection {
                title: "Getting Started".to_string(),
                lessons: vec![
                    lesson("Basic Concepts", "20:45", "We'll cover the fundamental concepts you need to understand."),
                    lesson("Your First Project", "25:10", "Let's build our first project together, step by step."),
                ],
            },
        ],
    }
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|t| t.to_string()).collect()
}

pub fn demo_courses() -> Vec<NewCourse> {
    vec![
        NewCourse {
            title: "Full Stack Web Development: React, Node & MongoDB".to_string(),
            description: "Master front-end and back-end technologies to build complete web applications from scratch."
                .to_string(),
            price: 8999,
            duration: "12 weeks".to_string(),
            level: "Intermediate".to_string(),
            image_url: "https://images.unsplash.com/photo-1516321318423-f06f85e504b3".to_string(),
            instructor: "John Smith".to_string(),
            category: "Web Development".to_string(),
            tags: tags(&["JavaScript", "React", "Node.js", "MongoDB"]),
            featured: true,
            content: demo_content(),
        },
        NewCourse {
            title: "Data Science & Machine Learning with Python".to_string(),
            description: "Learn to analyze data, create models, and implement machine learning algorithms.".to_string(),
            price: 7499,
            duration: "8 weeks".to_string(),
            level: "Intermediate".to_string(),
            image_url: "https://images.unsplash.com/photo-1551434678-e076c223a692".to_string(),
            instructor: "Olivia Johnson".to_string(),
            category: "Data Science".to_string(),
            tags: tags(&["Python", "Machine Learning", "Data Analysis"]),
            featured: true,
            content: demo_content(),
        },
        NewCourse {
            title: "UI/UX Design Masterclass: Create Modern Interfaces".to_string(),
            description: "Learn design principles and tools to create beautiful, user-friendly interfaces.".to_string(),
            price: 6999,
            duration: "10 weeks".to_string(),
            level: "Beginner".to_string(),
            image_url: "https://images.unsplash.com/photo-1522542550221-31fd19575a2d".to_string(),
            instructor: "Michael Davis".to_string(),
            category: "Design".to_string(),
            tags: tags(&["UI", "UX", "Figma", "Design Principles"]),
            featured: true,
            content: demo_content(),
        },
    ]
}

/// Insert the demo courses into an empty catalog; returns how many were added
pub async fn seed_demo_courses(app_data: &AppData) -> Result<usize, InternalError> {
    if app_data.course_store.count(&app_data.db).await? > 0 {
        tracing::debug!("Catalog not empty, skipping demo courses");
        return Ok(0);
    }

    let courses = demo_courses();
    let total = courses.len();
    for course in courses {
        app_data.course_store.create(&app_data.db, course).await?;
    }

    tracing::info!(count = total, "Seeded demo courses");

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_test_app_data;

    #[tokio::test]
    async fn test_seeds_once() {
        let app_data = setup_test_app_data().await;

        assert_eq!(seed_demo_courses(&app_data).await.unwrap(), 3);
        assert_eq!(seed_demo_courses(&app_data).await.unwrap(), 0);

        let courses = app_data.course_store.list_all(&app_data.db).await.unwrap();
        assert_eq!(courses.len(), 3);
        assert!(courses.iter().all(|c| c.featured && c.enrollments == 0));
        assert!(courses.iter().all(|c| c.content.lesson_count() == 4));
        assert_eq!(courses[0].price, 8999);
    }
}
