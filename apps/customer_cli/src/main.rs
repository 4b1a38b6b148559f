use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    AddressField, CreateWorkflow, CustomerField, DialogHost, FieldPath, HttpCustomerService,
    PhoneField, Section, UpdateWorkflow, Workflow, WorkflowError,
};
use shared::domain::Customer;
use tracing_subscriber::EnvFilter;

mod config;

use config::load_settings;

#[derive(Parser, Debug)]
#[command(name = "customer_cli", about = "Register, look up, update and delete customers")]
struct Cli {
    /// Address of the customer store; overrides settings file and environment.
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Browse all customers one page at a time.
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Look a customer up by id.
    Show { id: String },
    /// Register a new customer with one phone and one address.
    Create(CreateArgs),
    /// Edit fields of an existing customer, e.g. `--set endereco.rua="Rua B"`.
    Update {
        id: String,
        #[arg(long = "set", value_name = "PATH=VALUE", value_parser = parse_assignment)]
        set: Vec<(FieldPath, String)>,
    },
    /// Delete a customer. Without --confirm only shows what would be deleted.
    Delete {
        id: String,
        #[arg(long)]
        confirm: bool,
    },
}

#[derive(Args, Debug)]
struct CreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    social_name: String,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    ddd: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    street: String,
    #[arg(long)]
    number: String,
    #[arg(long)]
    district: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    state: String,
    #[arg(long)]
    postal_code: String,
    #[arg(long, default_value = "")]
    extra: String,
}

fn parse_assignment(raw: &str) -> Result<(FieldPath, String), String> {
    let (path, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected PATH=VALUE, got '{raw}'"))?;
    let path = path.parse::<FieldPath>().map_err(|e| e.to_string())?;
    Ok((path, value.to_string()))
}

fn notice(err: WorkflowError) -> anyhow::Error {
    let notice = err.notice();
    anyhow::Error::new(err).context(notice)
}

fn print_customer(customer: &Customer) {
    let id = customer
        .id
        .map_or_else(|| "unsaved".to_string(), |id| id.to_string());
    println!("#{id} {} ({})", customer.name, customer.social_name);
    println!("  email:   {}", customer.email.as_deref().unwrap_or("-"));
    for phone in &customer.phones {
        println!("  phone:   ({}) {}", phone.area_code, phone.number);
    }
    let address = &customer.address;
    println!(
        "  address: {}, {} - {}, {}/{} {}",
        address.street,
        address.number,
        address.neighborhood,
        address.city,
        address.state,
        address.postal_code
    );
    if !address.additional_info.is_empty() {
        println!("           {}", address.additional_info);
    }
}

fn fill_create(workflow: &mut CreateWorkflow, fields: &[(FieldPath, &str)]) -> Result<()> {
    for (path, value) in fields {
        workflow.change(*path, value).map_err(notice)?;
    }
    workflow.next().map_err(notice)?;
    Ok(())
}

async fn run_create(host: &mut DialogHost, args: CreateArgs) -> Result<()> {
    let workflow = host.open_create();
    let email = args.email.unwrap_or_default();

    fill_create(
        workflow,
        &[
            (FieldPath::Customer(CustomerField::Name), args.name.as_str()),
            (FieldPath::Customer(CustomerField::SocialName), args.social_name.as_str()),
            (FieldPath::Customer(CustomerField::Email), email.as_str()),
        ],
    )?;
    fill_create(
        workflow,
        &[
            (FieldPath::first_phone(PhoneField::AreaCode), args.ddd.as_str()),
            (FieldPath::first_phone(PhoneField::Number), args.phone.as_str()),
        ],
    )?;
    fill_create(
        workflow,
        &[
            (FieldPath::Address(AddressField::Street), args.street.as_str()),
            (FieldPath::Address(AddressField::Number), args.number.as_str()),
            (FieldPath::Address(AddressField::Neighborhood), args.district.as_str()),
            (FieldPath::Address(AddressField::City), args.city.as_str()),
            (FieldPath::Address(AddressField::State), args.state.as_str()),
            (FieldPath::Address(AddressField::PostalCode), args.postal_code.as_str()),
            (FieldPath::Address(AddressField::AdditionalInfo), args.extra.as_str()),
        ],
    )?;

    match workflow.submit().await.map_err(notice)? {
        Some(created) => {
            println!("Customer registered.");
            print_customer(&created);
        }
        None => println!("Customer registered."),
    }
    host.close();
    Ok(())
}

fn apply_section(
    workflow: &mut UpdateWorkflow,
    section: Section,
    assignments: &[(FieldPath, String)],
) -> Result<()> {
    for (path, value) in assignments.iter().filter(|(path, _)| path.section() == section) {
        let before = workflow
            .draft()
            .and_then(|customer| path.value_in(customer))
            .unwrap_or_default()
            .to_string();
        if workflow.change(*path, value).map_err(notice)? {
            println!("  {path}: '{before}' -> '{value}'");
        } else {
            println!("  {path}: skipped, customer has no phone to edit");
        }
    }
    Ok(())
}

async fn run_update(host: &mut DialogHost, id: String, set: Vec<(FieldPath, String)>) -> Result<()> {
    let workflow = host.open_update();
    workflow.set_id_input(id);
    workflow.search().await.map_err(notice)?;

    for section in [Section::Personal, Section::Phone, Section::Address] {
        apply_section(workflow, section, &set)?;
        workflow.next().map_err(notice)?;
    }

    workflow.submit().await.map_err(notice)?;
    println!("Customer updated.");
    host.close();
    Ok(())
}

async fn run_delete(host: &mut DialogHost, id: String, confirm: bool) -> Result<()> {
    let workflow = host.open_delete();
    workflow.set_id_input(id);
    workflow.next().map_err(notice)?;

    if confirm {
        let deleted = workflow.confirm().await.map_err(notice)?;
        println!("Customer {deleted} deleted.");
    } else if let Some(pending) = workflow.pending_id() {
        println!("About to delete customer {pending}. Re-run with --confirm to delete it.");
        workflow.back();
    }
    host.close();
    Ok(())
}

async fn run_show(host: &mut DialogHost, id: String) -> Result<()> {
    let workflow = host.open_lookup();
    workflow.set_id_input(id);
    workflow.search().await.map_err(notice)?;
    if let Some(customer) = workflow.customer() {
        print_customer(customer);
    }
    host.close();
    Ok(())
}

async fn run_list(host: &mut DialogHost, page: usize) -> Result<()> {
    host.show_list().await.map_err(notice)?;
    let list = host.list_mut();
    list.go_to(page);
    if list.is_empty() {
        println!("No customers registered.");
    } else {
        println!("Page {} of {}", list.current_page(), list.total_pages());
        for customer in list.page_items() {
            print_customer(customer);
        }
    }
    host.hide_list();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings()?;
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }

    let service = HttpCustomerService::with_timeout(&settings.base_url, settings.request_timeout())
        .with_context(|| format!("cannot use customer store at '{}'", settings.base_url))?;
    let mut host = DialogHost::new(Arc::new(service), settings.page_size);

    match cli.command {
        Command::List { page } => run_list(&mut host, page).await,
        Command::Show { id } => run_show(&mut host, id).await,
        Command::Create(args) => run_create(&mut host, args).await,
        Command::Update { id, set } => run_update(&mut host, id, set).await,
        Command::Delete { id, confirm } => run_delete(&mut host, id, confirm).await,
    }
}
