//! Petition workflow engine for HYDRAA.
//!
//! This crate holds the business rules for encroachment petitions: who may
//! do what, in which status, and with which input. It sits on top of the
//! storage layer and is driven by the CLI.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        hydraa (CLI)                         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      WorkflowService                        │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────────┐    │
//! │  │ Permissions │ │ Validation  │ │    Lifecycle        │    │
//! │  │ (roles)     │ │ (input)     │ │    State Machine    │    │
//! │  └─────────────┘ └─────────────┘ └─────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                    ┌──────────────────┐
//!                    │      Store       │
//!                    │ (RocksDB/memory) │
//!                    └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use hydraa_store::{Petitioner, RocksStore};
//! use hydraa_workflow::{seed, NewPetition, Workflow, WorkflowService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(RocksStore::open("/tmp/hydraa")?);
//! seed::seed_directory(&*store)?;
//!
//! let workflow = WorkflowService::with_defaults(store);
//! let session = workflow.login("reception@hydraa.gov.in", "password").await?;
//!
//! let petitioner = Petitioner {
//!     name: "Rajesh Kumar".to_string(),
//!     phone: "9876543210".to_string(),
//!     address: "Plot 12, Lake View Colony".to_string(),
//! };
//! let request = NewPetition::new(petitioner, "Compound wall built into the lake bed");
//! let petition = workflow.create_petition(&session, request).await?;
//!
//! println!("Registered {}", petition.petition_number);
//! # Ok(())
//! # }
//! ```
//!
//! # State Machine
//!
//! Petitions move forward only:
//!
//! - `Pending` → `Assigned` (HOD assigns one to three officers)
//! - `Assigned` → `Under Investigation` (first officer report)
//! - `Under Investigation` → `Under Investigation` (further reports)
//! - `Under Investigation` → `Decision Made` (HOD decision, terminal)
//!
//! See the [`lifecycle`] module for transition validation helpers and
//! [`permissions`] for the role table.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod directory;
pub mod error;
pub mod lifecycle;
pub mod permissions;
pub mod seed;
pub mod service;
pub mod session;
pub mod types;
pub mod validation;

pub use error::{ErrorKind, Result, WorkflowError};
pub use permissions::{authorize, visible_actions, visible_actions_for, Operation};
pub use service::{Workflow, WorkflowService};
pub use session::Session;
pub use types::{
    DashboardStats, Decision, FeedbackSubmission, NewPetition, OfficerAssignment, PetitionHistory,
    PetitionQuery, UserForm, WorkflowConfig,
};
