use todo_client::api::{TodoApi, TodoUpdate};
use todo_client::config::ClientConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ClientConfig::load()?;
    let api = TodoApi::connect(&config).await?;
    tracing::debug!(
        "Session is {}",
        if api.is_remote() { "remote" } else { "local" }
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("list") => {
            for todo in api.get_all().await? {
                let mark = if todo.completed { "x" } else { " " };
                println!("[{mark}] {:>4}  {}", todo.id, todo.title);
            }
        }
        Some("add") if args.len() > 1 => {
            let todo = api.create(args[1..].join(" ")).await?;
            println!("added {}: {}", todo.id, todo.title);
        }
        Some("show") if args.len() == 2 => {
            let todo = api.get_by_id(parse_id(&args[1])?).await?;
            println!("{}", serde_json::to_string_pretty(&todo)?);
        }
        Some("done") if args.len() == 2 => {
            let changes = TodoUpdate {
                completed: Some(true),
                ..Default::default()
            };
            let todo = api.update(parse_id(&args[1])?, changes).await?;
            println!("done {}: {}", todo.id, todo.title);
        }
        Some("undone") if args.len() == 2 => {
            let changes = TodoUpdate {
                completed: Some(false),
                ..Default::default()
            };
            let todo = api.update(parse_id(&args[1])?, changes).await?;
            println!("reopened {}: {}", todo.id, todo.title);
        }
        Some("edit") if args.len() > 2 => {
            let changes = TodoUpdate {
                title: Some(args[2..].join(" ")),
                ..Default::default()
            };
            let todo = api.update(parse_id(&args[1])?, changes).await?;
            println!("edited {}: {}", todo.id, todo.title);
        }
        Some("rm") if args.len() == 2 => {
            let id = parse_id(&args[1])?;
            api.delete(id).await?;
            println!("removed {id}");
        }
        _ => {
            eprintln!("usage: todo-client [list | add <title> | show <id> | done <id> | undone <id> | edit <id> <title> | rm <id>]");
            std::process::exit(2);
        }
    }

    Ok(())
}

fn parse_id(raw: &str) -> anyhow::Result<i64> {
    raw.parse()
        .map_err(|_| anyhow::anyhow!("{raw:?} is not a todo id"))
}
