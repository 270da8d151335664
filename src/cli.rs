use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};

use employee_console::ApiClient;
use employee_console::auth::gate::{self, Action};
use employee_console::controller::{
    EmployeeFormController, EmployeeListController, LoginController, RoleManagementController,
};
use employee_console::model::employee::{Employee, EmployeeDraft, EmployeeId};
use employee_console::model::role::Role;
use employee_console::model::user::UserRoleRecord;

#[derive(Parser)]
#[command(name = "employee-console", about = "Manage employees and user roles")]
pub struct Cli {
    /// Backend base url, overrides API_BASE_URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Where the session is kept, overrides SESSION_FILE
    #[arg(long, global = true)]
    pub session_file: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and store the session
    Login(Credentials),
    /// Create an account (role USER)
    Register(Credentials),
    /// Forget the stored session
    Logout,
    /// Show the current session and what it allows
    Whoami,
    /// List employees
    List,
    /// Show one employee
    Show { id: u64 },
    /// Add an employee (MANAGER or ADMIN)
    Add {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
    },
    /// Edit an employee, unspecified fields keep their value (MANAGER or ADMIN)
    Edit {
        id: u64,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Delete an employee (ADMIN)
    Delete { id: u64 },
    /// List users with their roles
    Roles,
    /// Change a user's role (ADMIN, not for other admins)
    SetRole { username: String, role: Role },
}

#[derive(clap::Args)]
pub struct Credentials {
    #[arg(short, long)]
    username: Option<String>,
    #[arg(short, long, env = "EMPLOYEE_CONSOLE_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl Credentials {
    fn resolve(self) -> Result<(String, String)> {
        let username = match self.username {
            Some(u) => u,
            None => Input::<String>::new()
                .with_prompt("Username")
                .interact_text()
                .context("Failed to read username")?,
        };
        let password = match self.password {
            Some(p) => p,
            None => Password::new()
                .with_prompt("Password")
                .interact()
                .context("Failed to read password")?,
        };
        Ok((username, password))
    }
}

pub async fn run(command: Command, api: ApiClient) -> Result<()> {
    match command {
        Command::Login(creds) => {
            let (username, password) = creds.resolve()?;
            let role = LoginController::new(api).login(&username, &password).await?;
            println!("Login successful! Logged in as {username} ({role})");
        }
        Command::Register(creds) => {
            let (username, password) = creds.resolve()?;
            let message = LoginController::new(api)
                .register(&username, &password)
                .await?;
            println!("{message}");
        }
        Command::Logout => {
            LoginController::new(api).logout()?;
            println!("Logged out");
        }
        Command::Whoami => {
            let (session, actions) = LoginController::new(api).whoami();
            if !session.is_authenticated() {
                println!("Not logged in");
                return Ok(());
            }
            let role = session
                .role
                .map(|r| r.to_string())
                .unwrap_or_else(|| "<none>".into());
            println!("Role: {role}");
            if let Some(at) = session.established_at {
                println!("Logged in since: {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            let actions: Vec<String> = actions.iter().map(|a| a.to_string()).collect();
            println!("Allowed: {}", actions.join(", "));
        }
        Command::List => {
            let mut list = EmployeeListController::new(api);
            list.load().await?;
            print_employees(list.employees());
        }
        Command::Show { id } => {
            let employee = EmployeeFormController::new(api)
                .edit(EmployeeId(id))
                .await?;
            print_employees(std::slice::from_ref(&employee));
        }
        Command::Add {
            first_name,
            last_name,
            email,
        } => {
            let draft = EmployeeDraft {
                first_name,
                last_name,
                email,
            };
            let saved = EmployeeFormController::new(api).submit(&draft, None).await?;
            println!("Employee added!");
            print_employees(std::slice::from_ref(&saved));
        }
        Command::Edit {
            id,
            first_name,
            last_name,
            email,
        } => {
            let form = EmployeeFormController::new(api);
            let id = EmployeeId(id);
            let current = form.edit(id).await?;
            let mut draft = EmployeeDraft::from(&current);
            if let Some(v) = first_name {
                draft.first_name = v;
            }
            if let Some(v) = last_name {
                draft.last_name = v;
            }
            if let Some(v) = email {
                draft.email = v;
            }
            let saved = form.submit(&draft, Some(id)).await?;
            println!("Employee updated!");
            print_employees(std::slice::from_ref(&saved));
        }
        Command::Delete { id } => {
            let mut list = EmployeeListController::new(api);
            list.load().await?;
            list.remove(EmployeeId(id)).await?;
            println!("Employee deleted successfully!");
            print_employees(list.employees());
        }
        Command::Roles => {
            let mut roles = RoleManagementController::new(api);
            roles.load().await?;
            print_roles(&roles);
        }
        Command::SetRole { username, role } => {
            let mut roles = RoleManagementController::new(api);
            roles.load().await?;
            roles.promote(&username, role).await?;
            println!("Role updated to {role} for {username}");
            print_roles(&roles);
        }
    }
    Ok(())
}

fn print_employees(employees: &[Employee]) {
    if employees.is_empty() {
        println!("No employees");
        return;
    }
    println!(
        "{:<6} {:<15} {:<15} {:<30} {:<15}",
        "ID", "First Name", "Last Name", "Email", "Created By"
    );
    for e in employees {
        println!(
            "{:<6} {:<15} {:<15} {:<30} {:<15}",
            e.id, e.first_name, e.last_name, e.email, e.username
        );
    }
}

fn print_roles(roles: &RoleManagementController) {
    for user in roles.users() {
        println!("{:<20} {:<8} {}", user.username, user.role, access_note(roles, user));
    }
}

fn access_note(roles: &RoleManagementController, user: &UserRoleRecord) -> &'static str {
    let protected = !gate::is_allowed(Some(Role::Admin), Action::ChangeRole { target: user.role });
    if roles.can_change(user) {
        "changeable"
    } else if protected {
        "Cannot Change"
    } else {
        "Read Only"
    }
}
