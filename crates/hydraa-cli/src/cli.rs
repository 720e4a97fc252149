//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand};
use hydraa_core::{PetitionNumber, UserId};
use hydraa_store::{Designation, PetitionStatus, PetitionType, Role, SubmittedBy, TimeBound};

/// HYDRAA petition workflow.
#[derive(Parser, Debug)]
#[command(name = "hydraa")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding the local database.
    #[arg(long, env = "HYDRAA_DATA_DIR", default_value = "hydraa-data")]
    pub data_dir: PathBuf,

    /// Workflow configuration file (JSON).
    #[arg(long, env = "HYDRAA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the simulated login delay (milliseconds).
    #[arg(long, env = "HYDRAA_LOGIN_DELAY_MS")]
    pub login_delay_ms: Option<u64>,

    /// Enable debug logging.
    #[arg(long, default_value = "false")]
    pub debug: bool,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install the demo user directory.
    Init,
    /// Log in by email.
    Login {
        /// Login email.
        #[arg(long)]
        email: String,
        /// Password (any non-empty value).
        #[arg(long, env = "HYDRAA_PASSWORD")]
        password: String,
    },
    /// Log out.
    Logout,
    /// Show the logged-in user.
    Whoami,
    /// Petition operations.
    #[command(subcommand)]
    Petition(PetitionCommand),
    /// List the enquiry officers available for assignment.
    Officers,
    /// User directory administration.
    #[command(subcommand)]
    Users(UserCommand),
    /// Show per-status petition counts.
    Stats,
    /// Browse reference data.
    #[command(subcommand)]
    Reference(ReferenceCommand),
}

/// Petition subcommands.
#[derive(Subcommand, Debug)]
pub enum PetitionCommand {
    /// Register a new petition.
    Create(CreateArgs),
    /// List petitions.
    List {
        /// Only petitions in this status.
        #[arg(long)]
        status: Option<PetitionStatus>,
        /// Only petitions with this time bound.
        #[arg(long)]
        time_bound: Option<TimeBound>,
        /// Only Priority and Immediate petitions.
        #[arg(long)]
        priority_only: bool,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Show a petition with its reports and decision.
    Show {
        /// Petition number, e.g. PTN000012024.
        number: PetitionNumber,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Assign enquiry officers.
    Assign {
        /// Petition number.
        number: PetitionNumber,
        /// Officer user ID (repeat for up to three).
        #[arg(long = "officer", required = true)]
        officers: Vec<UserId>,
        /// Change the time bound.
        #[arg(long)]
        time_bound: Option<TimeBound>,
        /// Instructions to the officers.
        #[arg(long)]
        instructions: Option<String>,
    },
    /// File an investigation report.
    Feedback {
        /// Petition number.
        number: PetitionNumber,
        /// Site inspection observations.
        #[arg(long)]
        observations: String,
        /// Findings and recommendations.
        #[arg(long)]
        findings: String,
        /// Details of pending litigation.
        #[arg(long, default_value = "")]
        litigation: String,
        /// Evidence file reference (repeatable).
        #[arg(long)]
        evidence: Vec<String>,
        /// Final report reference.
        #[arg(long)]
        report: Option<String>,
    },
    /// Record the final decision.
    Decide {
        /// Petition number.
        number: PetitionNumber,
        /// The decision, e.g. "Approved".
        #[arg(long)]
        action: String,
        /// Closing remarks.
        #[arg(long, default_value = "")]
        remarks: String,
    },
}

/// Arguments for `petition create`.
#[derive(ClapArgs, Debug)]
pub struct CreateArgs {
    /// Petitioner name.
    #[arg(long)]
    pub name: String,
    /// Petitioner phone.
    #[arg(long)]
    pub phone: String,
    /// Petitioner address.
    #[arg(long)]
    pub address: String,
    /// The complaint.
    #[arg(long)]
    pub complaint: String,
    /// Date received (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Channel the petition came through.
    #[arg(long = "type", default_value = "General")]
    pub petition_type: PetitionType,
    /// Who filed the petition.
    #[arg(long, default_value = "Individual")]
    pub submitted_by: SubmittedBy,
    /// Information about the respondent.
    #[arg(long, default_value = "")]
    pub respondent: String,
    /// Encroachment zone.
    #[arg(long, requires_all = ["sub_zone", "area"])]
    pub zone: Option<String>,
    /// Encroachment sub-zone.
    #[arg(long, requires = "zone")]
    pub sub_zone: Option<String>,
    /// Encroachment area.
    #[arg(long, requires = "zone")]
    pub area: Option<String>,
    /// Encroachment type ID (repeatable).
    #[arg(long = "encroachment-type")]
    pub encroachment_types: Vec<String>,
    /// Scanned petition reference.
    #[arg(long)]
    pub file: Option<String>,
    /// Remark recorded at intake.
    #[arg(long, default_value = "")]
    pub remark: String,
    /// Priority tier.
    #[arg(long, default_value = "Normal")]
    pub time_bound: TimeBound,
}

/// User directory subcommands.
#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// List users.
    List {
        /// Case-insensitive search over name, employee ID, email and role.
        #[arg(long)]
        search: Option<String>,
    },
    /// Add a user.
    Add(UserFields),
    /// Edit a user. Omitted fields keep their value.
    Edit {
        /// User ID.
        user_id: UserId,
        /// New values.
        #[command(flatten)]
        fields: UserEdits,
    },
    /// Remove a user.
    Remove {
        /// User ID.
        user_id: UserId,
    },
}

/// Fields for `users add`.
#[derive(ClapArgs, Debug)]
pub struct UserFields {
    /// Employee number.
    #[arg(long)]
    pub employee_id: String,
    /// Full name.
    #[arg(long)]
    pub name: String,
    /// Rank.
    #[arg(long)]
    pub designation: Designation,
    /// Role.
    #[arg(long)]
    pub role: Role,
    /// Login email.
    #[arg(long)]
    pub email: String,
    /// Contact phone.
    #[arg(long)]
    pub phone: String,
}

/// Optional fields for `users edit`.
#[derive(ClapArgs, Debug)]
pub struct UserEdits {
    /// Employee number.
    #[arg(long)]
    pub employee_id: Option<String>,
    /// Full name.
    #[arg(long)]
    pub name: Option<String>,
    /// Rank.
    #[arg(long)]
    pub designation: Option<Designation>,
    /// Role.
    #[arg(long)]
    pub role: Option<Role>,
    /// Login email.
    #[arg(long)]
    pub email: Option<String>,
    /// Contact phone.
    #[arg(long)]
    pub phone: Option<String>,
}

/// Reference data subcommands.
#[derive(Subcommand, Debug)]
pub enum ReferenceCommand {
    /// List zones, the sub-zones of a zone, or the areas of a sub-zone.
    Locations {
        /// Zone to expand.
        #[arg(long)]
        zone: Option<String>,
        /// Sub-zone to expand.
        #[arg(long, requires = "zone")]
        sub_zone: Option<String>,
    },
    /// List encroachment types.
    Types,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn arguments_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_assignment() {
        let args = Args::try_parse_from([
            "hydraa",
            "petition",
            "assign",
            "PTN000012024",
            "--officer",
            "officer2",
            "--officer",
            "officer3",
            "--time-bound",
            "priority",
        ])
        .unwrap();

        let Command::Petition(PetitionCommand::Assign {
            number,
            officers,
            time_bound,
            ..
        }) = args.command
        else {
            panic!("expected petition assign");
        };
        assert_eq!(number.to_string(), "PTN000012024");
        assert_eq!(officers.len(), 2);
        assert_eq!(time_bound, Some(TimeBound::Priority));
    }

    #[test]
    fn zone_needs_full_path() {
        let result = Args::try_parse_from([
            "hydraa",
            "petition",
            "create",
            "--name",
            "Rajesh Kumar",
            "--phone",
            "9876543210",
            "--address",
            "Plot 12",
            "--complaint",
            "Wall in the lake bed",
            "--zone",
            "Hyderabad",
        ]);
        assert!(result.is_err());
    }
}
