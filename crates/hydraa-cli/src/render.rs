//! Text rendering of workflow snapshots.

use hydraa_store::{Petition, PetitionStatus, User};
use hydraa_workflow::{DashboardStats, Operation, PetitionHistory, Session};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

fn officer_list(petition: &Petition) -> String {
    if petition.assigned_officers.is_empty() {
        "-".to_string()
    } else {
        petition
            .assigned_officers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

/// One row per petition.
pub fn petition_table(petitions: &[Petition]) -> String {
    if petitions.is_empty() {
        return "No petitions found.".to_string();
    }

    let mut lines = vec![format!(
        "{:<13} {:<10} {:<19} {:<9} {:<24} {}",
        "NUMBER", "DATE", "STATUS", "BOUND", "PETITIONER", "OFFICERS"
    )];
    lines.extend(petitions.iter().map(|p| {
        format!(
            "{:<13} {:<10} {:<19} {:<9} {:<24} {}",
            p.petition_number.to_string(),
            p.date.format(DATE_FORMAT).to_string(),
            p.status.label(),
            p.time_bound.to_string(),
            p.petitioner.name,
            officer_list(p),
        )
    }));
    lines.join("\n")
}

/// Full petition view with reports, decision and the caller's actions.
pub fn petition_detail(history: &PetitionHistory, actions: &[Operation]) -> String {
    let p = &history.petition;
    let mut lines = vec![
        format!("Petition {} ({})", p.petition_number, p.status.label()),
        format!("  Date:          {}", p.date.format(DATE_FORMAT)),
        format!("  Type:          {}", p.petition_type),
        format!("  Time bound:    {}", p.time_bound),
        format!(
            "  Petitioner:    {} ({}), {}",
            p.petitioner.name, p.petitioner.phone, p.petitioner.address
        ),
        format!("  Submitted by:  {}", p.submitted_by),
        format!("  Complaint:     {}", p.complaint_details),
        format!("  Respondent:    {}", or_dash(&p.respondent_info)),
    ];

    if let Some(zone) = &p.encroachment_zone {
        lines.push(format!("  Location:      {zone}"));
    }
    if !p.encroachment_types.is_empty() {
        let types: Vec<&str> = p
            .encroachment_types
            .iter()
            .map(|id| {
                hydraa_core::reference::encroachment_type(id).map_or(id.as_str(), |t| t.name)
            })
            .collect();
        lines.push(format!("  Encroachment:  {}", types.join(", ")));
    }
    if let Some(file) = &p.petition_file {
        lines.push(format!("  File:          {file}"));
    }
    lines.push(format!("  Remark:        {}", or_dash(&p.initial_remark)));

    if !history.officers.is_empty() {
        let officers: Vec<String> = history
            .officers
            .iter()
            .map(|u| format!("{} ({})", u.name, u.handle))
            .collect();
        lines.push(format!("  Officers:      {}", officers.join(", ")));
    }
    if let Some(instructions) = &p.assignment_instructions {
        lines.push(format!("  Instructions:  {instructions}"));
    }

    for (i, report) in history.feedback.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!(
            "Report {} by {} at {}",
            i + 1,
            report.officer_id,
            report.submitted_at.format(TIME_FORMAT)
        ));
        lines.push(format!("  Observations:  {}", report.observations));
        lines.push(format!("  Litigation:    {}", or_dash(&report.litigation_pending)));
        lines.push(format!("  Findings:      {}", report.findings));
        if !report.evidence.is_empty() {
            lines.push(format!("  Evidence:      {}", report.evidence.join(", ")));
        }
        if let Some(final_report) = &report.final_report {
            lines.push(format!("  Final report:  {final_report}"));
        }
    }

    if let Some(decision) = &history.decision {
        lines.push(String::new());
        lines.push(format!(
            "Decision by {} at {}",
            decision.decided_by,
            decision.decided_at.format(TIME_FORMAT)
        ));
        lines.push(format!("  Action:        {}", decision.action));
        lines.push(format!("  Remarks:       {}", or_dash(&decision.final_remarks)));
    }

    if !actions.is_empty() {
        let names: Vec<&str> = actions.iter().map(|op| op.describe()).collect();
        lines.push(String::new());
        lines.push(format!("You can: {}", names.join(", ")));
    }

    lines.join("\n")
}

/// Per-status counts.
pub fn stats(stats: &DashboardStats) -> String {
    let mut lines: Vec<String> = PetitionStatus::ALL
        .iter()
        .map(|&status| format!("{:<20} {}", status.label(), stats.count(status)))
        .collect();
    lines.push(format!("{:<20} {}", "Total", stats.total()));
    lines.join("\n")
}

/// One row per user.
pub fn user_table(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }

    let mut lines = vec![format!(
        "{:<10} {:<8} {:<18} {:<16} {:<16} {}",
        "ID", "EMP", "NAME", "HANDLE", "ROLE", "EMAIL"
    )];
    lines.extend(users.iter().map(|u| {
        format!(
            "{:<10} {:<8} {:<18} {:<16} {:<16} {}",
            u.user_id.as_str(),
            u.employee_id,
            u.name,
            u.handle,
            u.role.label(),
            u.email
        )
    }));
    lines.join("\n")
}

/// The logged-in user and what they may do.
pub fn session(session: &Session, operations: &[Operation]) -> String {
    let user = session.user();
    let names: Vec<&str> = operations.iter().map(|op| op.describe()).collect();
    [
        format!("{} ({}) <{}>", user.name, user.handle, user.email),
        format!("Role: {} - {}", user.role.label(), user.role.description()),
        format!("Permissions: {}", names.join(", ")),
    ]
    .join("\n")
}
