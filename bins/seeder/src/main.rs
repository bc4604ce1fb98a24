//! Database seeder for Fluxo development and testing.
//!
//! Seeds a demo client, a project with board tasks, cash-flow transactions
//! (including a monthly rent template), an invoice, and a loan for local
//! development.
//!
//! Usage: cargo run --bin seeder

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use fluxo_db::entities::{
    clients, invoices, loans, project_tasks, projects,
    sea_orm_active_enums::{
        Frequency, InvoiceStatus, ProjectStatus, TaskStage, TransactionKind, TransactionStatus,
    },
    transactions,
};

/// Demo client ID (consistent for all seeds)
const DEMO_CLIENT_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Demo project ID (consistent for all seeds)
const DEMO_PROJECT_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Demo rent template ID (consistent for all seeds)
const DEMO_TEMPLATE_ID: &str = "00000000-0000-0000-0000-000000000003";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = fluxo_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo client...");
    seed_client(&db).await;

    println!("Seeding demo project...");
    seed_project(&db).await;

    println!("Seeding cash-flow transactions...");
    seed_transactions(&db).await;

    println!("Seeding demo invoice...");
    seed_invoice(&db).await;

    println!("Seeding demo loan...");
    seed_loan(&db).await;

    println!("Seeding complete!");
}

fn demo_client_id() -> Uuid {
    Uuid::parse_str(DEMO_CLIENT_ID).unwrap()
}

fn demo_project_id() -> Uuid {
    Uuid::parse_str(DEMO_PROJECT_ID).unwrap()
}

fn demo_template_id() -> Uuid {
    Uuid::parse_str(DEMO_TEMPLATE_ID).unwrap()
}

fn first_of_year() -> NaiveDate {
    let today = Utc::now().date_naive();
    NaiveDate::from_ymd_opt(today.year(), 1, 5).unwrap()
}

/// Seeds a demo client.
async fn seed_client(db: &DatabaseConnection) {
    if clients::Entity::find_by_id(demo_client_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo client already exists, skipping...");
        return;
    }

    let now = Utc::now().into();
    let client = clients::ActiveModel {
        id: Set(demo_client_id()),
        name: Set("Ana Souza".to_string()),
        company: Set(Some("Souza Design Ltda".to_string())),
        email: Set(Some("ana@souzadesign.com.br".to_string())),
        phone: Set(Some("+55 11 98888-0001".to_string())),
        notes: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };
    client.insert(db).await.expect("Failed to seed client");
}

/// Seeds a demo project with a small board.
async fn seed_project(db: &DatabaseConnection) {
    if projects::Entity::find_by_id(demo_project_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo project already exists, skipping...");
        return;
    }

    let now = Utc::now().into();
    let project = projects::ActiveModel {
        id: Set(demo_project_id()),
        name: Set("Site institucional".to_string()),
        client_id: Set(Some(demo_client_id())),
        status: Set(ProjectStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
    };
    project.insert(db).await.expect("Failed to seed project");

    let tasks = [
        ("Wireframes", TaskStage::Done, 0),
        ("Layout das páginas", TaskStage::Doing, 0),
        ("Conteúdo", TaskStage::Todo, 0),
        ("Publicação", TaskStage::Todo, 1),
    ];
    for (title, stage, position) in tasks {
        let task = project_tasks::ActiveModel {
            id: Set(Uuid::now_v7()),
            project_id: Set(demo_project_id()),
            title: Set(title.to_string()),
            stage: Set(stage),
            position: Set(position),
            created_at: Set(now),
            updated_at: Set(now),
        };
        task.insert(db).await.expect("Failed to seed task");
    }
}

/// Seeds a monthly rent template and a couple of plain transactions.
async fn seed_transactions(db: &DatabaseConnection) {
    if transactions::Entity::find_by_id(demo_template_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo transactions already exist, skipping...");
        return;
    }

    let now = Utc::now().into();
    let start = first_of_year();

    let rent = transactions::ActiveModel {
        id: Set(demo_template_id()),
        description: Set("Aluguel escritório".to_string()),
        amount: Set(Decimal::new(2500, 0)),
        kind: Set(TransactionKind::Expense),
        date: Set(start),
        status: Set(TransactionStatus::Paid),
        category: Set("fixed".to_string()),
        project_id: Set(None),
        client_id: Set(None),
        frequency: Set(Some(Frequency::Monthly)),
        created_at: Set(now),
        updated_at: Set(now),
    };
    rent.insert(db).await.expect("Failed to seed rent template");

    let income = transactions::ActiveModel {
        id: Set(Uuid::now_v7()),
        description: Set("Entrada projeto site".to_string()),
        amount: Set(Decimal::new(4000, 0)),
        kind: Set(TransactionKind::Income),
        date: Set(start),
        status: Set(TransactionStatus::Paid),
        category: Set("projects".to_string()),
        project_id: Set(Some(demo_project_id())),
        client_id: Set(Some(demo_client_id())),
        frequency: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    income.insert(db).await.expect("Failed to seed income");
}

/// Seeds a sent invoice for the demo client.
async fn seed_invoice(db: &DatabaseConnection) {
    let number = "2026-001";
    let existing = invoices::Entity::find().one(db).await.ok().flatten();
    if existing.is_some() {
        println!("  Invoices already exist, skipping...");
        return;
    }

    let now = Utc::now().into();
    let today = Utc::now().date_naive();
    let invoice = invoices::ActiveModel {
        id: Set(Uuid::now_v7()),
        number: Set(number.to_string()),
        client_id: Set(demo_client_id()),
        amount: Set(Decimal::new(4000, 0)),
        issue_date: Set(today),
        due_date: Set(today + chrono::Days::new(30)),
        status: Set(InvoiceStatus::Sent),
        created_at: Set(now),
        updated_at: Set(now),
    };
    invoice.insert(db).await.expect("Failed to seed invoice");
}

/// Seeds a 12-installment equipment loan.
async fn seed_loan(db: &DatabaseConnection) {
    let existing = loans::Entity::find().one(db).await.ok().flatten();
    if existing.is_some() {
        println!("  Loans already exist, skipping...");
        return;
    }

    let now = Utc::now().into();
    let loan = loans::ActiveModel {
        id: Set(Uuid::now_v7()),
        description: Set("Financiamento de equipamento".to_string()),
        principal: Set(Decimal::new(10000, 0)),
        installment_amount: Set(Decimal::new(900, 0)),
        installments: Set(12),
        first_due: Set(first_of_year()),
        frequency: Set(Frequency::Monthly),
        created_at: Set(now),
        updated_at: Set(now),
    };
    loan.insert(db).await.expect("Failed to seed loan");
}
