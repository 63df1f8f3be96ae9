use crate::stores::CategoryCount;

/// Admin dashboard figures
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub total_users: u64,
    pub total_courses: u64,
    pub total_enrollments: u64,
    pub completed_enrollments: u64,
    /// Whole percent, 0 when there are no enrollments
    pub completion_rate: u32,
    pub courses_by_category: Vec<CategoryCount>,
}
