//! Command-line front end: every service operation as a subcommand, results printed as JSON.

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};
use serde_json::{Value, json};
use tracing::info;

use crate::models::{
    Category, HelpOfferId, HelpRequestId, NewHelpOffer, NewHelpRequest, NewOffer, NewRequest,
    NewUser, OfferFilter, OfferId, OfferStatus, Priority, RequestFilter, RequestId,
    RequestStatus, UserId, UserType,
};
use crate::services::ServiceContext;
use crate::services::commands::{
    AcceptHelpOfferCommand, CommandExecutor, ConfirmHelpRequestCommand, GetStatisticsCommand,
    SeedDemoDataCommand,
};
use crate::services::core::{AuthService, HelpService, OfferService, RequestService};

#[derive(Debug, Parser)]
#[command(name = "aidbridge")]
#[command(about = "Match military requests with charity offers and reconcile delivered quantities")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "AIDBRIDGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database file (overrides config file)
    #[arg(short, long, env = "AIDBRIDGE_DATABASE")]
    pub database: Option<PathBuf>,

    /// Print the change events published while running the command
    #[arg(long)]
    pub show_events: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the database and load demo data
    Init,

    /// Register a new account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// military or charity
        #[arg(long = "type")]
        user_type: UserType,
        #[arg(long)]
        name: String,
    },

    /// Check credentials and show the account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Requests posted by military units
    #[command(subcommand)]
    Request(RequestCommands),

    /// Offers posted by charities
    #[command(subcommand)]
    Offer(OfferCommands),

    /// Help offered against a request
    #[command(subcommand)]
    HelpOffer(HelpOfferCommands),

    /// Help requested against an offer
    #[command(subcommand)]
    HelpRequest(HelpRequestCommands),

    /// Dashboard counters
    Stats,
}

#[derive(Debug, Subcommand)]
pub enum RequestCommands {
    /// Post a new request
    Create {
        /// Author's user id
        #[arg(long)]
        user: UserId,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        category: Category,
        #[arg(long, default_value = "non-critical")]
        priority: Priority,
        /// Free text such as "50 комплектів"
        #[arg(long)]
        quantity: String,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },

    /// Browse requests
    List {
        #[arg(long)]
        status: Option<RequestStatus>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        author: Option<UserId>,
    },

    /// An author's own requests, open ones first
    Mine {
        #[arg(long)]
        user: UserId,
    },

    /// Move a request forward through its lifecycle
    SetStatus { id: RequestId, status: RequestStatus },
}

#[derive(Debug, Subcommand)]
pub enum OfferCommands {
    /// Post a new offer
    Create {
        #[arg(long)]
        user: UserId,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        category: Category,
        #[arg(long)]
        quantity: String,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },

    /// Browse offers
    List {
        #[arg(long)]
        status: Option<OfferStatus>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        author: Option<UserId>,
        /// Only offers still available
        #[arg(long, conflicts_with = "status")]
        available: bool,
    },

    SetStatus { id: OfferId, status: OfferStatus },
}

#[derive(Debug, Subcommand)]
pub enum HelpOfferCommands {
    /// Offer help against a request
    Submit {
        /// Volunteer's user id
        #[arg(long)]
        user: UserId,
        #[arg(long)]
        request: RequestId,
        #[arg(long)]
        quantity: String,
        /// The volunteer's own offer the help is drawn from
        #[arg(long)]
        offer: Option<OfferId>,
        #[arg(long)]
        delivery_date: Option<String>,
        #[arg(long)]
        contact: String,
        #[arg(long)]
        message: Option<String>,
    },

    #[command(group(ArgGroup::new("scope").required(true).args(["request", "military", "volunteer"])))]
    List {
        #[arg(long)]
        request: Option<RequestId>,
        #[arg(long)]
        military: Option<UserId>,
        #[arg(long)]
        volunteer: Option<UserId>,
    },

    /// Accept help and reconcile quantities
    Accept { id: HelpOfferId, quantity: String },
}

#[derive(Debug, Subcommand)]
pub enum HelpRequestCommands {
    /// Ask for part of an offer
    Submit {
        /// Military user's id
        #[arg(long)]
        user: UserId,
        #[arg(long)]
        offer: OfferId,
        #[arg(long)]
        quantity: String,
        #[arg(long)]
        contact: String,
        #[arg(long)]
        message: Option<String>,
    },

    #[command(group(ArgGroup::new("scope").required(true).args(["offer", "charity", "military"])))]
    List {
        #[arg(long)]
        offer: Option<OfferId>,
        #[arg(long)]
        charity: Option<UserId>,
        #[arg(long)]
        military: Option<UserId>,
    },

    /// Confirm a help request and reconcile quantities
    Confirm { id: HelpRequestId, quantity: String },
}

/// Run one subcommand and return its output as JSON
pub async fn execute_command(ctx: &ServiceContext, command: Commands) -> Result<Value> {
    let output = match command {
        Commands::Init => {
            let result = CommandExecutor::execute(&SeedDemoDataCommand { ctx: ctx.clone() }).await?;
            json!({ "seeded": result.data })
        }
        Commands::Register {
            email,
            password,
            user_type,
            name,
        } => {
            let user = AuthService::register(
                ctx,
                NewUser {
                    email,
                    password,
                    user_type,
                    name,
                },
            )
            .await?;
            serde_json::to_value(user)?
        }
        Commands::Login { email, password } => {
            serde_json::to_value(AuthService::login(ctx, &email, &password).await?)?
        }
        Commands::Request(command) => execute_request(ctx, command).await?,
        Commands::Offer(command) => execute_offer(ctx, command).await?,
        Commands::HelpOffer(command) => execute_help_offer(ctx, command).await?,
        Commands::HelpRequest(command) => execute_help_request(ctx, command).await?,
        Commands::Stats => {
            let result = CommandExecutor::execute(&GetStatisticsCommand { ctx: ctx.clone() }).await?;
            serde_json::to_value(result.data)?
        }
    };
    Ok(output)
}

async fn execute_request(ctx: &ServiceContext, command: RequestCommands) -> Result<Value> {
    let output = match command {
        RequestCommands::Create {
            user,
            title,
            description,
            category,
            priority,
            quantity,
            location,
            image,
        } => {
            let request = RequestService::create(
                ctx,
                &user,
                NewRequest {
                    title,
                    description,
                    category,
                    priority,
                    quantity,
                    delivery_location: location,
                    image_url: image,
                },
            )
            .await?;
            serde_json::to_value(request)?
        }
        RequestCommands::List {
            status,
            category,
            priority,
            author,
        } => {
            let filter = RequestFilter {
                status,
                category,
                priority,
                author_id: author,
            };
            serde_json::to_value(RequestService::list(ctx, &filter).await?)?
        }
        RequestCommands::Mine { user } => {
            serde_json::to_value(RequestService::list_for_author(ctx, &user).await?)?
        }
        RequestCommands::SetStatus { id, status } => {
            serde_json::to_value(RequestService::update_status(ctx, &id, status).await?)?
        }
    };
    Ok(output)
}

async fn execute_offer(ctx: &ServiceContext, command: OfferCommands) -> Result<Value> {
    let output = match command {
        OfferCommands::Create {
            user,
            title,
            description,
            category,
            quantity,
            location,
            image,
        } => {
            let offer = OfferService::create(
                ctx,
                &user,
                NewOffer {
                    title,
                    description,
                    category,
                    quantity,
                    delivery_location: location,
                    image_url: image,
                },
            )
            .await?;
            serde_json::to_value(offer)?
        }
        OfferCommands::List {
            status,
            category,
            author,
            available,
        } => {
            let filter = OfferFilter {
                status: if available {
                    Some(OfferStatus::Available)
                } else {
                    status
                },
                category,
                author_id: author,
            };
            serde_json::to_value(OfferService::list(ctx, &filter).await?)?
        }
        OfferCommands::SetStatus { id, status } => {
            serde_json::to_value(OfferService::update_status(ctx, &id, status).await?)?
        }
    };
    Ok(output)
}

async fn execute_help_offer(ctx: &ServiceContext, command: HelpOfferCommands) -> Result<Value> {
    let output = match command {
        HelpOfferCommands::Submit {
            user,
            request,
            quantity,
            offer,
            delivery_date,
            contact,
            message,
        } => {
            let help = HelpService::offer_help(
                ctx,
                &user,
                &request,
                NewHelpOffer {
                    available_quantity: quantity,
                    offer_id: offer,
                    delivery_date,
                    contact_info: contact,
                    message,
                },
            )
            .await?;
            serde_json::to_value(help)?
        }
        HelpOfferCommands::List {
            request,
            military,
            volunteer,
        } => {
            let found = match (request, military, volunteer) {
                (Some(request_id), _, _) => {
                    HelpService::help_offers_for_request(ctx, &request_id).await?
                }
                (None, Some(military_id), _) => {
                    HelpService::help_offers_for_military(ctx, &military_id).await?
                }
                (None, None, Some(volunteer_id)) => {
                    HelpService::help_offers_by_volunteer(ctx, &volunteer_id).await?
                }
                (None, None, None) => Vec::new(),
            };
            serde_json::to_value(found)?
        }
        HelpOfferCommands::Accept { id, quantity } => {
            let result = CommandExecutor::execute(&AcceptHelpOfferCommand {
                ctx: ctx.clone(),
                help_offer_id: id,
                accepted_quantity: quantity,
            })
            .await?;
            info!(
                "Reconciliation finished in {} ms",
                result.execution_time_ms
            );
            serde_json::to_value(result.data)?
        }
    };
    Ok(output)
}

async fn execute_help_request(
    ctx: &ServiceContext,
    command: HelpRequestCommands,
) -> Result<Value> {
    let output = match command {
        HelpRequestCommands::Submit {
            user,
            offer,
            quantity,
            contact,
            message,
        } => {
            let help = HelpService::request_help(
                ctx,
                &user,
                &offer,
                NewHelpRequest {
                    requested_quantity: quantity,
                    contact_info: contact,
                    message,
                },
            )
            .await?;
            serde_json::to_value(help)?
        }
        HelpRequestCommands::List {
            offer,
            charity,
            military,
        } => {
            let found = match (offer, charity, military) {
                (Some(offer_id), _, _) => HelpService::help_requests_for_offer(ctx, &offer_id).await?,
                (None, Some(charity_id), _) => {
                    HelpService::help_requests_for_charity(ctx, &charity_id).await?
                }
                (None, None, Some(military_id)) => {
                    HelpService::help_requests_by_military(ctx, &military_id).await?
                }
                (None, None, None) => Vec::new(),
            };
            serde_json::to_value(found)?
        }
        HelpRequestCommands::Confirm { id, quantity } => {
            let result = CommandExecutor::execute(&ConfirmHelpRequestCommand {
                ctx: ctx.clone(),
                help_request_id: id,
                confirmed_quantity: quantity,
            })
            .await?;
            info!(
                "Reconciliation finished in {} ms",
                result.execution_time_ms
            );
            serde_json::to_value(result.data)?
        }
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_accept() {
        let cli = Cli::try_parse_from([
            "aidbridge",
            "--show-events",
            "help-offer",
            "accept",
            "ho-1",
            "20 комплектів",
        ])
        .unwrap();

        assert!(cli.show_events);
        match cli.command {
            Commands::HelpOffer(HelpOfferCommands::Accept { id, quantity }) => {
                assert_eq!(id.as_str(), "ho-1");
                assert_eq!(quantity, "20 комплектів");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parses_enum_values() {
        let cli = Cli::try_parse_from([
            "aidbridge",
            "request",
            "list",
            "--status",
            "in-progress",
            "--priority",
            "critical",
        ])
        .unwrap();

        match cli.command {
            Commands::Request(RequestCommands::List {
                status, priority, ..
            }) => {
                assert_eq!(status, Some(RequestStatus::InProgress));
                assert_eq!(priority, Some(Priority::Critical));
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from(["aidbridge", "request", "list", "--status", "done"]).is_err());
    }

    #[test]
    fn test_help_offer_list_requires_a_scope() {
        assert!(Cli::try_parse_from(["aidbridge", "help-offer", "list"]).is_err());
        assert!(
            Cli::try_parse_from(["aidbridge", "help-offer", "list", "--volunteer", "u1"]).is_ok()
        );
    }
}
