//! Sample campaign used to seed the in-memory backend.

use chrono::NaiveDate;

use crate::task::{
    Assignee, Deliverable, Influencer, Platform, Priority, Status, Task, TaskId, TaskLinks,
};

fn influencer(id: &str, handle: &str, name: &str, platform: Platform) -> Influencer {
    Influencer {
        id: id.to_string(),
        handle: handle.to_string(),
        name: name.to_string(),
        platform,
        avatar_url: None,
    }
}

fn assignee(id: &str, name: &str) -> Assignee {
    Assignee {
        id: id.to_string(),
        name: name.to_string(),
        avatar_url: None,
    }
}

/// Influencer roster offered by the create and edit forms.
pub fn sample_influencers() -> Vec<Influencer> {
    vec![
        influencer("inf-1", "@glowwithmaya", "Maya Chen", Platform::Instagram),
        influencer("inf-2", "@dannydoesfitness", "Danny Ortiz", Platform::TikTok),
        influencer("inf-3", "@techwithtara", "Tara Singh", Platform::YouTube),
        influencer("inf-4", "@plantbasedpete", "Pete Walsh", Platform::Instagram),
        influencer("inf-5", "@lena.travels", "Lena Fischer", Platform::TikTok),
    ]
}

pub fn sample_tasks() -> Vec<Task> {
    let roster = sample_influencers();
    let sam = assignee("user-1", "Sam Rivera");
    let jo = assignee("user-2", "Jo Park");
    let alex = assignee("user-3", "Alex Kim");

    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d);

    vec![
        Task {
            id: TaskId::from("task-1"),
            title: "Summer skincare launch post".to_string(),
            influencer: roster[0].clone(),
            priority: Priority::High,
            status: Status::Backlog,
            due_date: date(2026, 11, 2),
            assignees: Some(vec![sam.clone()]),
            budget: Some(2500),
            deliverable: Some(Deliverable::Post),
            links: Some(TaskLinks {
                brief_url: Some("https://example.com/briefs/skincare".to_string()),
                assets_url: None,
            }),
            notes: Some("Needs product shots before scheduling".to_string()),
        },
        Task {
            id: TaskId::from("task-2"),
            title: "Workout challenge short".to_string(),
            influencer: roster[1].clone(),
            priority: Priority::Medium,
            status: Status::InProgress,
            due_date: date(2026, 10, 25),
            assignees: Some(vec![jo.clone(), sam.clone()]),
            budget: Some(1800),
            deliverable: Some(Deliverable::Short),
            links: None,
            notes: None,
        },
        Task {
            id: TaskId::from("task-3"),
            title: "Laptop unboxing review".to_string(),
            influencer: roster[2].clone(),
            priority: Priority::High,
            status: Status::AwaitingApproval,
            due_date: date(2026, 10, 20),
            assignees: Some(vec![alex.clone()]),
            budget: Some(4000),
            deliverable: Some(Deliverable::Reel),
            links: None,
            notes: None,
        },
        Task {
            id: TaskId::from("task-4"),
            title: "Meal prep story series".to_string(),
            influencer: roster[3].clone(),
            priority: Priority::Low,
            status: Status::Done,
            due_date: date(2026, 10, 1),
            assignees: None,
            budget: Some(900),
            deliverable: Some(Deliverable::Story),
            links: None,
            notes: None,
        },
        Task {
            id: TaskId::from("task-5"),
            title: "City guide reel".to_string(),
            influencer: roster[4].clone(),
            priority: Priority::Medium,
            status: Status::Backlog,
            due_date: None,
            assignees: Some(vec![jo]),
            budget: None,
            deliverable: Some(Deliverable::Reel),
            links: None,
            notes: None,
        },
    ]
}
