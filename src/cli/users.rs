//! CLI handlers for employee records and the company structure.

use crate::api::{CompanyStructure, FindUsersDto, User, UsersApi};
use crate::directory::{
    departments, fallback_departments, fallback_grades, fallback_positions, filtered_grades,
    filtered_positions, label_for, ShiftPreference, WorkSchedule,
};
use crate::error::Result;
use crate::http::ApiClient;

use super::{ListArgs, StructureArgs};

/// Handle `crm users list`.
pub async fn handle_list(client: ApiClient, args: ListArgs) -> Result<()> {
    let filter = FindUsersDto {
        department: args.department,
        position: args.position,
        grade: args.grade,
        work_schedule: args.schedule,
        shift_preference: args.shift,
        page: args.page,
    };
    let response = UsersApi::new(client).get_users(&filter).await?;
    for user in &response.data {
        print_user_row(user);
    }
    println!(
        "\npage {}/{} ({} total)",
        response.meta.page, response.meta.total_pages, response.meta.total
    );
    Ok(())
}

/// Handle `crm users search <query>`.
pub async fn handle_search(client: ApiClient, query: &str) -> Result<()> {
    let response = UsersApi::new(client).search_users(query).await?;
    if response.data.is_empty() {
        println!("No users match '{query}'.");
    }
    for user in &response.data {
        print_user_row(user);
    }
    Ok(())
}

/// Handle `crm users show <id>`.
pub async fn handle_show(client: ApiClient, id: &str) -> Result<()> {
    let user = UsersApi::new(client).user_page(id).await?;
    println!("{}", user.full_name);
    print_field("Email", user.email.as_deref());
    print_field("Department", user.department.as_deref());
    print_field("Position", user.position.as_deref());
    print_field("Grade", user.grade.as_deref());
    print_field(
        "Schedule",
        user.work_schedule
            .as_deref()
            .map(label_for::<WorkSchedule>)
            .as_deref(),
    );
    print_field(
        "Shift",
        user.shift_preference
            .as_deref()
            .map(label_for::<ShiftPreference>)
            .as_deref(),
    );
    print_field("Phone", user.phone_number.as_deref());
    print_field("Telegram", user.tg_link.as_deref());
    Ok(())
}

/// Handle `crm users me`.
pub async fn handle_me(client: ApiClient) -> Result<()> {
    let me = UsersApi::new(client).current_user_profile().await?;
    let name = [me.profile.last_name.as_deref(), me.profile.first_name.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    println!("{name} <{}>", me.email);
    print_field("Role", Some(me.role.as_str()));
    print_field("Department", me.work_info.department.as_deref());
    print_field("Position", me.work_info.position.as_deref());
    print_field("Grade", me.work_info.grade.as_deref());
    println!("  Member since: {}", me.created_at.format("%Y-%m-%d"));
    Ok(())
}

/// Handle `crm structure`.
pub async fn handle_structure(client: ApiClient, args: StructureArgs) -> Result<()> {
    let structure = UsersApi::new(client).company_structure().await?;
    print_structure(&structure, &args);
    Ok(())
}

fn print_structure(structure: &CompanyStructure, args: &StructureArgs) {
    let department = args.department.as_deref().unwrap_or("");
    let position = args.position.as_deref().unwrap_or("");

    if department.is_empty() && position.is_empty() {
        println!("Departments:");
        let mut listed = departments(Some(structure));
        if listed.is_empty() {
            listed = fallback_departments();
        }
        for dept in listed {
            println!("  {:<16} {}", dept.code, dept.name);
        }
    }

    println!("Positions:");
    for pos in filtered_positions(Some(structure), department, &fallback_positions(department)) {
        println!("  {:<16} {}", pos.code, pos.name);
    }

    println!("Grades:");
    for grade in filtered_grades(Some(structure), department, position, &fallback_grades(department)) {
        println!("  {:<16} {}", grade.code, grade.name);
    }
}

fn print_user_row(user: &User) {
    println!(
        "{:<26} {:<32} {:<16} {}",
        user.id,
        user.full_name,
        user.department.as_deref().unwrap_or("-"),
        user.position.as_deref().unwrap_or("-"),
    );
}

fn print_field(label: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        println!("  {label}: {value}");
    }
}
