//! Subcommand implementations.

use std::sync::Arc;

use anyhow::bail;
use carelink_api::types::{
    AccountUpdate, MedicalProfileUpdate, NewAccount, QueueEntryUpdate, QueueStatus,
};
use carelink_api::ApiClient;
use carelink_core::{AppConfig, Coordinate, HospitalDirectory};
use carelink_match::{MatchError, TravelProfile};
use chrono::{TimeDelta, Utc};

use crate::store::FileCredentialStore;
use crate::{Commands, QueueAction, RequestsAction};

pub(crate) async fn run(command: Commands, config: &AppConfig) -> anyhow::Result<()> {
    let store = Arc::new(FileCredentialStore::new(config.credentials_path.clone()));
    let client = ApiClient::new(
        &config.api_base_url,
        config.request_timeout_secs,
        &config.user_agent,
        store,
    )?;

    match command {
        Commands::Register {
            username,
            password,
            email,
            date_of_birth,
            hospital_name,
            address,
            phone,
        } => {
            let account = match (date_of_birth, hospital_name) {
                (Some(date_of_birth), None) => NewAccount::Patient {
                    username,
                    password,
                    email,
                    date_of_birth,
                },
                (None, Some(hospital_name)) => NewAccount::Hospital {
                    username,
                    password,
                    email,
                    hospital_name,
                    address: address.unwrap_or_default(),
                    phone_number: phone.unwrap_or_default(),
                },
                _ => bail!("pass either --date-of-birth (patient) or --hospital-name (hospital)"),
            };
            let registered = client.register(&account).await?;
            println!("{}", registered.message);
            if let Some(status) = registered.status {
                println!("status: {status}");
            }
        }
        Commands::Login { username, password } => {
            client.login(&username, &password).await?;
            let profile = client.session_profile().await?;
            println!("logged in as {} ({:?})", profile.username, profile.user_type);
        }
        Commands::Logout => {
            client.logout();
            println!("session cleared");
        }
        Commands::Whoami => {
            let profile = client.session_profile().await?;
            println!(
                "{} ({:?}, verified: {})",
                profile.username, profile.user_type, profile.is_verified
            );
            if let Some(hospital_name) = profile.hospital_name {
                println!("hospital: {hospital_name}");
            }
        }
        Commands::Profile => {
            let account = client.account().await?;
            println!("{} ({:?})", account.username, account.user_type);
            if let Some(profile) = account.profile {
                if let Some(date_of_birth) = profile.date_of_birth {
                    println!("date of birth: {date_of_birth}");
                }
                if !profile.address.is_empty() {
                    println!("address: {}", profile.address);
                }
                if !profile.allergies.is_empty() {
                    println!("allergies: {}", profile.allergies);
                }
                if !profile.pre_existing_conditions.is_empty() {
                    println!("conditions: {}", profile.pre_existing_conditions);
                }
                if !profile.emergency_notes.is_empty() {
                    println!("emergency notes: {}", profile.emergency_notes);
                }
            }
            if let Some(hospital) = account.hospital_profile {
                println!("facility: {} — {}", hospital.hospital_name, hospital.address);
            }
        }
        Commands::UpdateAccount { username, email } => {
            let update = AccountUpdate { username, email };
            let account = client.update_account(&update).await?;
            println!("account updated: {}", account.username);
        }
        Commands::UpdateProfile {
            date_of_birth,
            address,
            allergies,
            conditions,
            emergency_notes,
        } => {
            let update = MedicalProfileUpdate {
                date_of_birth,
                address,
                allergies,
                pre_existing_conditions: conditions,
                emergency_notes,
            };
            client.update_medical_profile(&update).await?;
            println!("medical profile updated");
        }
        Commands::Hospitals => {
            let directory = fresh_directory(&client, config).await?;
            for hospital in &directory.hospitals {
                println!(
                    "#{} {} — {} min wait — {}",
                    hospital.id, hospital.name, hospital.wait_minutes, hospital.address
                );
            }
        }
        Commands::Recommend {
            latitude,
            longitude,
            ambulance,
        } => {
            let profile = if ambulance {
                TravelProfile::Ambulance
            } else {
                TravelProfile::Driving
            };
            let directory = fresh_directory(&client, config).await?;
            let user = Coordinate::new(latitude, longitude);
            match carelink_match::rank_with(user, &directory.hospitals, profile) {
                Ok(ranked) => {
                    for (position, scored) in ranked.iter().enumerate() {
                        println!(
                            "{}. {} — {} min total ({} min travel + {} min wait, {:.1} km)",
                            position + 1,
                            scored.hospital.name,
                            scored.score,
                            scored.travel_minutes,
                            scored.hospital.wait_minutes,
                            scored.distance_km
                        );
                    }
                    println!(
                        "\nbest match: {} ({})",
                        ranked[0].hospital.name, ranked[0].hospital.address
                    );
                }
                Err(MatchError::NoHospitals) => {
                    println!("no hospitals available right now — call emergency services directly");
                }
            }
        }
        Commands::RequestAdmission {
            latitude,
            longitude,
            reason,
        } => {
            let outcome = client
                .request_admission(&reason, Coordinate::new(latitude, longitude))
                .await?;
            println!(
                "request #{} sent to {} ({:?})",
                outcome.request_id, outcome.recommended_hospital.name, outcome.status
            );
            println!("reasoning: {}", outcome.reasoning);
        }
        Commands::Dispatch {
            latitude,
            longitude,
        } => {
            let outcome = client
                .emergency_dispatch(Coordinate::new(latitude, longitude))
                .await?;
            println!(
                "dispatch to: {} — {}",
                outcome.recommended_hospital.name, outcome.recommended_hospital.address
            );
            println!("reasoning: {}", outcome.reasoning);
            println!("operator script: {}", outcome.tts_script_for_911);
        }
        Commands::EmergencyCall => {
            let outcome = client.emergency_call().await?;
            println!("{}: {}", outcome.status, outcome.message);
        }
        Commands::Queue { action } => match action {
            QueueAction::List => {
                let entries = client.queue().await?;
                if entries.is_empty() {
                    println!("queue is empty");
                }
                for entry in entries {
                    println!(
                        "#{} {} — priority {} — est. {} min — {:?}",
                        entry.id,
                        entry.patient.username,
                        entry.priority_score,
                        entry.estimated_service_time,
                        entry.status
                    );
                }
            }
            QueueAction::Admit { patient_id } => {
                let entry = client.admit_patient(patient_id).await?;
                println!(
                    "admitted {} (priority {}, est. {} min)",
                    entry.patient.username, entry.priority_score, entry.estimated_service_time
                );
            }
            QueueAction::Update {
                id,
                status,
                priority,
                minutes,
                notes,
            } => {
                let update = QueueEntryUpdate {
                    status: status.as_deref().map(parse_queue_status).transpose()?,
                    priority_score: priority,
                    estimated_service_time: minutes,
                    notes,
                };
                let entry = client.update_queue_entry(id, &update).await?;
                println!("queue entry #{} is now {:?}", entry.id, entry.status);
            }
        },
        Commands::Requests { action } => match action {
            RequestsAction::List => {
                let requests = client.incoming_requests().await?;
                if requests.is_empty() {
                    println!("no pending requests");
                }
                for request in requests {
                    println!(
                        "#{} {} — {} — {}",
                        request.id, request.patient_name, request.reason_for_visit,
                        request.created_at
                    );
                }
            }
            RequestsAction::Accept { id } => {
                let accepted = client.accept_request(id).await?;
                println!(
                    "{} (queue entry #{})",
                    accepted.message, accepted.queue_entry.id
                );
            }
            RequestsAction::Reject { id } => {
                let rejected = client.reject_request(id).await?;
                println!("{}", rejected.message);
            }
        },
    }

    Ok(())
}

fn parse_queue_status(raw: &str) -> anyhow::Result<QueueStatus> {
    match raw {
        "waiting" => Ok(QueueStatus::Waiting),
        "in_progress" => Ok(QueueStatus::InProgress),
        "completed" => Ok(QueueStatus::Completed),
        "cancelled" => Ok(QueueStatus::Cancelled),
        other => bail!("unknown queue status \"{other}\""),
    }
}

/// Fetches the hospital directory and stamps it; refetches once if the
/// fetch itself took long enough to exceed the configured max age.
async fn fresh_directory(
    client: &ApiClient,
    config: &AppConfig,
) -> anyhow::Result<HospitalDirectory> {
    let max_age =
        TimeDelta::seconds(i64::try_from(config.hospitals_max_age_secs).unwrap_or(i64::MAX));
    let directory = HospitalDirectory::new(client.list_hospitals().await?, Utc::now());
    if directory.is_stale(max_age, Utc::now()) {
        tracing::warn!("hospital snapshot exceeded its max age; refetching");
        return Ok(HospitalDirectory::new(
            client.list_hospitals().await?,
            Utc::now(),
        ));
    }
    Ok(directory)
}
