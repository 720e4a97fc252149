//! Command handlers.
//!
//! Each handler restores the persisted session where one is needed, calls
//! the workflow and prints the result to stdout.

use anyhow::bail;
use hydraa_core::{reference, PetitionNumber, UserId};
use hydraa_store::{EncroachmentZone, Petitioner, RocksStore, Store};
use hydraa_workflow::permissions::permitted_operations;
use hydraa_workflow::session::require;
use hydraa_workflow::{
    authorize, seed, visible_actions_for, Decision, FeedbackSubmission, NewPetition,
    OfficerAssignment, Operation, PetitionQuery, Session, UserForm, Workflow, WorkflowError,
    WorkflowService,
};

use crate::cli::{
    Command, CreateArgs, PetitionCommand, ReferenceCommand, UserCommand, UserEdits, UserFields,
};
use crate::render;

type Service = WorkflowService<RocksStore>;

/// Dispatch a parsed command.
pub async fn run(service: &Service, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Init => init(service),
        Command::Login { email, password } => {
            let session = service.login(&email, &password).await?;
            println!("Logged in as {} ({})", session.user().name, session.role());
            Ok(())
        }
        Command::Logout => {
            service.logout().await?;
            println!("Logged out.");
            Ok(())
        }
        Command::Whoami => {
            let session = current(service).await?;
            let operations = permitted_operations(session.role());
            println!("{}", render::session(&session, &operations));
            Ok(())
        }
        Command::Petition(command) => petition(service, command).await,
        Command::Officers => {
            let session = current(service).await?;
            let officers = service.enquiry_officers(&session).await?;
            println!("{}", render::user_table(&officers));
            Ok(())
        }
        Command::Users(command) => users(service, command).await,
        Command::Stats => {
            let session = current(service).await?;
            let stats = service.dashboard(&session).await?;
            println!("{}", render::stats(&stats));
            Ok(())
        }
        Command::Reference(command) => reference_data(&command),
    }
}

async fn current(service: &Service) -> Result<Session, WorkflowError> {
    require(service.restore_session().await?)
}

fn init(service: &Service) -> anyhow::Result<()> {
    let inserted = seed::seed_directory(service.store())?;
    if inserted == 0 {
        println!("User directory already seeded.");
    } else {
        println!("Seeded {inserted} users. Log in with e.g. reception@hydraa.gov.in.");
    }
    Ok(())
}

async fn lookup(
    service: &Service,
    session: &Session,
    number: &PetitionNumber,
) -> Result<hydraa_core::PetitionId, WorkflowError> {
    Ok(service.find_petition(session, number).await?.petition_id)
}

fn zone_of(args: &CreateArgs) -> anyhow::Result<Option<EncroachmentZone>> {
    match (&args.zone, &args.sub_zone, &args.area) {
        (None, None, None) => Ok(None),
        (Some(zone), Some(sub_zone), Some(area)) => Ok(Some(EncroachmentZone {
            level1: zone.clone(),
            level2: sub_zone.clone(),
            level3: area.clone(),
        })),
        _ => bail!("--zone, --sub-zone and --area must be given together"),
    }
}

fn new_petition(args: CreateArgs) -> anyhow::Result<NewPetition> {
    let encroachment_zone = zone_of(&args)?;
    let mut request = NewPetition::new(
        Petitioner {
            name: args.name,
            phone: args.phone,
            address: args.address,
        },
        args.complaint,
    );
    request.date = args.date;
    request.petition_type = args.petition_type;
    request.submitted_by = args.submitted_by;
    request.respondent_info = args.respondent;
    request.encroachment_zone = encroachment_zone;
    request.encroachment_types = args.encroachment_types.into_iter().collect();
    request.petition_file = args.file;
    request.initial_remark = args.remark;
    request.time_bound = args.time_bound;
    Ok(request)
}

async fn petition(service: &Service, command: PetitionCommand) -> anyhow::Result<()> {
    let session = current(service).await?;

    match command {
        PetitionCommand::Create(args) => {
            let petition = service
                .create_petition(&session, new_petition(args)?)
                .await?;
            println!("Registered petition {}", petition.petition_number);
        }
        PetitionCommand::List {
            status,
            time_bound,
            priority_only,
            json,
        } => {
            let query = PetitionQuery {
                status,
                time_bound,
                priority_only,
            };
            let petitions = service.list_petitions(&session, query).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&petitions)?);
            } else {
                println!("{}", render::petition_table(&petitions));
            }
        }
        PetitionCommand::Show { number, json } => {
            let petition_id = lookup(service, &session, &number).await?;
            let history = service.petition_history(&session, &petition_id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&history)?);
            } else {
                let actions = visible_actions_for(&history.petition, &session);
                println!("{}", render::petition_detail(&history, &actions));
            }
        }
        PetitionCommand::Assign {
            number,
            officers,
            time_bound,
            instructions,
        } => {
            let petition_id = lookup(service, &session, &number).await?;
            let assignment = OfficerAssignment {
                officer_ids: officers,
                time_bound,
                instructions,
            };
            let petition = service
                .assign_officers(&session, &petition_id, assignment)
                .await?;
            println!(
                "Petition {} assigned to {} officer(s)",
                petition.petition_number,
                petition.assigned_officers.len()
            );
        }
        PetitionCommand::Feedback {
            number,
            observations,
            findings,
            litigation,
            evidence,
            report,
        } => {
            let petition_id = lookup(service, &session, &number).await?;
            let submission = FeedbackSubmission {
                observations,
                litigation_pending: litigation,
                evidence,
                findings,
                final_report: report,
            };
            let petition = service
                .submit_feedback(&session, &petition_id, submission)
                .await?;
            println!(
                "Report filed on {} ({})",
                petition.petition_number,
                petition.status.label()
            );
        }
        PetitionCommand::Decide {
            number,
            action,
            remarks,
        } => {
            let petition_id = lookup(service, &session, &number).await?;
            let petition = service
                .record_decision(&session, &petition_id, Decision::new(action, remarks))
                .await?;
            println!("Decision recorded on {}", petition.petition_number);
        }
    }

    Ok(())
}

impl From<UserFields> for UserForm {
    fn from(fields: UserFields) -> Self {
        Self {
            employee_id: fields.employee_id,
            name: fields.name,
            designation: fields.designation,
            role: fields.role,
            email: fields.email,
            phone: fields.phone,
        }
    }
}

/// Overlay the given edits on a user's current details.
fn apply_edits(
    service: &Service,
    session: &Session,
    user_id: &UserId,
    edits: UserEdits,
) -> anyhow::Result<UserForm> {
    authorize(session, Operation::ManageUsers)?;
    let Some(user) = service.store().get_user(user_id)? else {
        return Err(WorkflowError::UserNotFound(user_id.clone()).into());
    };
    Ok(UserForm {
        employee_id: edits.employee_id.unwrap_or(user.employee_id),
        name: edits.name.unwrap_or(user.name),
        designation: edits.designation.unwrap_or(user.designation),
        role: edits.role.unwrap_or(user.role),
        email: edits.email.unwrap_or(user.email),
        phone: edits.phone.unwrap_or(user.phone),
    })
}

async fn users(service: &Service, command: UserCommand) -> anyhow::Result<()> {
    let session = current(service).await?;

    match command {
        UserCommand::List { search } => {
            let users = service.list_users(&session, search.as_deref()).await?;
            println!("{}", render::user_table(&users));
        }
        UserCommand::Add(fields) => {
            let user = service.create_user(&session, fields.into()).await?;
            println!("Created user {} ({})", user.user_id, user.handle);
        }
        UserCommand::Edit { user_id, fields } => {
            let form = apply_edits(service, &session, &user_id, fields)?;
            let user = service.update_user(&session, &user_id, form).await?;
            println!("Updated user {} ({})", user.user_id, user.handle);
        }
        UserCommand::Remove { user_id } => {
            service.delete_user(&session, &user_id).await?;
            println!("Removed user {user_id}");
        }
    }

    Ok(())
}

fn reference_data(command: &ReferenceCommand) -> anyhow::Result<()> {
    match command {
        ReferenceCommand::Locations {
            zone: None,
            sub_zone: None,
        } => {
            for zone in reference::zones() {
                println!("{zone}");
            }
        }
        ReferenceCommand::Locations {
            zone: Some(zone),
            sub_zone: None,
        } => {
            let Some(sub_zones) = reference::sub_zones(zone) else {
                bail!("Unknown zone: {zone}");
            };
            for sub_zone in sub_zones {
                println!("{sub_zone}");
            }
        }
        ReferenceCommand::Locations {
            zone: Some(zone),
            sub_zone: Some(sub_zone),
        } => {
            let Some(areas) = reference::areas(zone, sub_zone) else {
                bail!("Unknown location: {zone} / {sub_zone}");
            };
            for area in areas {
                println!("{area}");
            }
        }
        ReferenceCommand::Locations { zone: None, .. } => {
            bail!("--sub-zone requires --zone");
        }
        ReferenceCommand::Types => {
            for kind in reference::ENCROACHMENT_TYPES {
                println!("{:>3}  {}", kind.id, kind.name);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Utc};
    use clap::Parser;
    use std::sync::Arc;
    use tempfile::TempDir;

    use crate::cli::Args;

    fn setup() -> (Service, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(RocksStore::open(dir.path()).unwrap());
        let config = hydraa_workflow::WorkflowConfig {
            login_delay_ms: 0,
            ..Default::default()
        };
        (WorkflowService::new(store, config), dir)
    }

    fn parse(args: &[&str]) -> Command {
        let mut argv = vec!["hydraa"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap().command
    }

    #[tokio::test]
    async fn commands_require_login() {
        let (service, _dir) = setup();
        run(&service, parse(&["init"])).await.unwrap();

        let err = run(&service, parse(&["stats"])).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WorkflowError>(),
            Some(WorkflowError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn register_and_assign() {
        let (service, _dir) = setup();
        run(&service, parse(&["init"])).await.unwrap();
        run(
            &service,
            parse(&["login", "--email", "reception@hydraa.gov.in", "--password", "x"]),
        )
        .await
        .unwrap();
        run(
            &service,
            parse(&[
                "petition",
                "create",
                "--name",
                "Rajesh Kumar",
                "--phone",
                "9876543210",
                "--address",
                "Plot 12, Lake View Colony",
                "--complaint",
                "Compound wall built into the lake bed",
                "--date",
                "2024-06-01",
            ]),
        )
        .await
        .unwrap();

        run(
            &service,
            parse(&["login", "--email", "commissioner@hydraa.gov.in", "--password", "x"]),
        )
        .await
        .unwrap();
        let number = PetitionNumber::new(1, u16::try_from(Utc::now().year()).unwrap()).unwrap();
        run(
            &service,
            parse(&["petition", "assign", &number.to_string(), "--officer", "officer2"]),
        )
        .await
        .unwrap();

        let petition = service
            .store()
            .get_petition_by_number(&number)
            .unwrap()
            .unwrap();
        assert_eq!(petition.assigned_officers.len(), 1);
    }

    #[tokio::test]
    async fn user_edits_need_admin() {
        let (service, _dir) = setup();
        run(&service, parse(&["init"])).await.unwrap();
        run(
            &service,
            parse(&["login", "--email", "reception@hydraa.gov.in", "--password", "x"]),
        )
        .await
        .unwrap();

        // Refused before the directory is consulted, even for unknown users
        for target in ["ghost", "officer2"] {
            let err = run(&service, parse(&["users", "edit", target, "--name", "Someone Else"]))
                .await
                .unwrap_err();
            assert!(matches!(
                err.downcast_ref::<WorkflowError>(),
                Some(WorkflowError::RoleNotPermitted { .. })
            ));
        }

        run(
            &service,
            parse(&["login", "--email", "admin@hydraa.gov.in", "--password", "x"]),
        )
        .await
        .unwrap();
        let err = run(&service, parse(&["users", "edit", "ghost", "--name", "Someone Else"]))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<WorkflowError>(),
            Some(WorkflowError::UserNotFound(_))
        ));
    }

    #[test]
    fn partial_zone_rejected() {
        let Command::Petition(PetitionCommand::Create(mut args)) = parse(&[
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
        ]) else {
            panic!("expected petition create");
        };
        assert!(zone_of(&args).unwrap().is_none());

        args.sub_zone = Some("West".to_string());
        assert!(zone_of(&args).is_err());
    }
}
