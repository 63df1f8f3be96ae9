use poem_openapi::Object;

use crate::stores::CategoryCount;
use crate::types::internal::analytics::Dashboard;

#[derive(Object, Debug)]
pub struct CategoryCountResponse {
    pub category: String,
    pub count: i64,
}

impl From<CategoryCount> for CategoryCountResponse {
    fn from(c: CategoryCount) -> Self {
        Self {
            category: c.category,
            count: c.count,
        }
    }
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub total_users: u64,
    pub total_courses: u64,
    pub total_enrollments: u64,
    pub completed_enrollments: u64,
    /// Whole percent
    pub completion_rate: u32,
    pub courses_by_category: Vec<CategoryCountResponse>,
}

impl From<Dashboard> for DashboardResponse {
    fn from(d: Dashboard) -> Self {
        Self {
            total_users: d.total_users,
            total_courses: d.total_courses,
            total_enrollments: d.total_enrollments,
            completed_enrollments: d.completed_enrollments,
            completion_rate: d.completion_rate,
            courses_by_category: d.courses_by_category.into_iter().map(CategoryCountResponse::from).collect(),
        }
    }
}
