use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use clients_registry::{
    ClientRepository, analytics,
    config::{self, Config},
    db, export,
    models::{Client, ClientFields},
};

/// Manage the clients registry
#[derive(Parser, Debug)]
#[command(name = "clients_registry", version, about, long_about = None)]
struct Cli {
    /// Database file (overrides DATABASE_PATH)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every client
    List,
    /// Search clients by a substring of one field
    Search {
        /// One of: id, firstName, lastName, companyName, region, city,
        /// dateOfBirth, gender, phone, email
        #[arg(long)]
        field: String,
        #[arg(long)]
        value: String,
    },
    /// Show one client
    View { id: i64 },
    /// Add a client
    Add(ClientArgs),
    /// Replace the fields of an existing client
    Update {
        id: i64,
        #[command(flatten)]
        fields: ClientArgs,
    },
    /// Delete a client
    Delete { id: i64 },
    /// Write every client to a CSV file
    Export {
        /// Destination (overrides EXPORT_PATH)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Counts by gender, city and region
    Analytics,
}

#[derive(Args, Debug)]
struct ClientArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    middle_name: Option<String>,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    company_name: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    region: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    nationality: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    date_of_birth: Option<String>,
    #[arg(long)]
    gender: Option<String>,
    /// Repeat the flag or separate numbers with commas
    #[arg(long = "phone", required = true, value_delimiter = ',')]
    phones: Vec<String>,
    #[arg(long)]
    email: Option<String>,
}

impl From<ClientArgs> for ClientFields {
    fn from(args: ClientArgs) -> Self {
        ClientFields {
            first_name: args.first_name,
            middle_name: args.middle_name,
            last_name: args.last_name,
            company_name: args.company_name,
            address: args.address,
            region: args.region,
            city: args.city,
            nationality: args.nationality,
            date_of_birth: args.date_of_birth,
            gender: args.gender,
            phone: args.phones,
            email: args.email,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = config::init()?;
    if let Some(path) = cli.database {
        config.database_path = path;
    }
    init_tracing(&config);

    // Initialize database connection
    let handle = db::acquire(&config).await?;
    let repo = ClientRepository::new(handle);

    let result = run(cli.command, &repo, &config).await;

    db::shutdown().await;
    result
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Command, repo: &ClientRepository, config: &Config) -> Result<()> {
    match command {
        Command::List => {
            print_list(&repo.list_all().await?);
        }
        Command::Search { field, value } => {
            print_list(&repo.search_by_field(&field, &value).await?);
        }
        Command::View { id } => match repo.find_by_id(id).await? {
            Some(client) => print_details(&client),
            None => bail!("Client {id} not found."),
        },
        Command::Add(args) => match repo.create(args.into()).await? {
            Some(client) => println!("Client added with ID {}", client.id),
            None => bail!("No client was added."),
        },
        Command::Update { id, fields } => match repo.update(id, fields.into()).await? {
            Some(client) => {
                println!("Client updated:");
                print_details(&client);
            }
            None => bail!("Client {id} not found."),
        },
        Command::Delete { id } => {
            let result = repo.delete(id).await?;
            if result.rows_affected == 0 {
                bail!("Client {id} not found.");
            }
            println!("{}", result.message);
        }
        Command::Export { output } => {
            let clients = repo.list_all().await?;
            if clients.is_empty() {
                bail!("No clients found to export.");
            }
            let path = output.unwrap_or_else(|| config.export_path().to_path_buf());
            export::export_all(&clients, &path)?;
            println!("Exported {} clients to {}", clients.len(), path.display());
        }
        Command::Analytics => {
            let clients = repo.list_all().await?;
            print!("{}", analytics::aggregate(&clients));
        }
    }

    Ok(())
}

fn print_list(clients: &[Client]) {
    if clients.is_empty() {
        println!("No clients found.");
        return;
    }
    for client in clients {
        println!("{client}");
    }
}

fn print_details(client: &Client) {
    let opt = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    println!("ID:            {}", client.id);
    println!("First name:    {}", client.first_name);
    println!("Middle name:   {}", opt(&client.middle_name));
    println!("Last name:     {}", client.last_name);
    println!("Company:       {}", client.company_name);
    println!("Address:       {}", client.address);
    println!("Region:        {}", client.region);
    println!("City:          {}", client.city);
    println!("Nationality:   {}", opt(&client.nationality));
    println!("Date of birth: {}", opt(&client.date_of_birth));
    println!("Gender:        {}", opt(&client.gender));
    println!("Phone:         {}", client.phone.join(", "));
    println!("Email:         {}", opt(&client.email));
    if let Some(created) = client.created_at {
        println!("Created at:    {created}");
    }
    if let Some(updated) = client.updated_at {
        println!("Updated at:    {updated}");
    }
}
