use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use marketplace_client::profile::{
    IdentityUser, ManagementApiClient, ProfileEditor, SubmitOutcome, TokenRequest, greeting_now,
};
use marketplace_client::{
    ListOffersResponse, ListPostsResponse, MarketplaceClient, MarketplaceClientError, Offer,
    OfferInput, OfferStatus, Post, PostInput,
};
use tracing_subscriber::EnvFilter;

mod identity;

use identity::CliIdentitySession;

const TOKEN_FILE: &str = ".marketplace_token";
const IDENTITY_TOKEN_FILE: &str = ".identity_token";
const DEFAULT_HTTP_SERVER: &str = "http://127.0.0.1:8080";

#[derive(Debug, Parser)]
#[command(
    name = "marketplace-cli",
    version,
    about = "CLI клиент для marketplace-server"
)]
struct Cli {
    /// Адрес HTTP сервера.
    #[arg(long, global = true, env = "MARKETPLACE_HTTP_URL")]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Управление сохранённым токеном API.
    #[command(subcommand)]
    Token(TokenCommand),
    /// Посты покупателей.
    #[command(subcommand)]
    Post(PostCommand),
    /// Офферы дилеров.
    #[command(subcommand)]
    Offer(OfferCommand),
    /// Профиль пользователя у identity-провайдера.
    #[command(subcommand)]
    Profile(ProfileCommand),
}

#[derive(Debug, Subcommand)]
enum TokenCommand {
    /// Сохраняет bearer-токен в .marketplace_token.
    Set { token: String },
    /// Удаляет сохранённый токен.
    Clear,
}

#[derive(Debug, Args)]
struct PostFieldArgs {
    #[arg(long)]
    car_make: Option<String>,
    #[arg(long)]
    car_model: Option<String>,
    #[arg(long)]
    car_year: Option<String>,
    #[arg(long)]
    zip_code: Option<String>,
    #[arg(long)]
    radius: Option<f64>,
    #[arg(long)]
    mileage: Option<f64>,
    #[arg(long)]
    trim: Option<String>,
    #[arg(long)]
    color: Option<String>,
    #[arg(long)]
    drivetrain: Option<String>,
    #[arg(long)]
    image_url: Option<String>,
    #[arg(long)]
    info: Option<String>,
}

impl PostFieldArgs {
    /// Переносит переданные флаги поверх `input`, остальное не трогает.
    fn apply_to(self, input: &mut PostInput) {
        let PostFieldArgs {
            car_make,
            car_model,
            car_year,
            zip_code,
            radius,
            mileage,
            trim,
            color,
            drivetrain,
            image_url,
            info,
        } = self;

        input.car_make = car_make.or(input.car_make.take());
        input.car_model = car_model.or(input.car_model.take());
        input.car_year = car_year.or(input.car_year.take());
        input.zip_code = zip_code.or(input.zip_code.take());
        input.radius = radius.or(input.radius);
        input.mileage = mileage.or(input.mileage);
        input.trim = trim.or(input.trim.take());
        input.color = color.or(input.color.take());
        input.drivetrain = drivetrain.or(input.drivetrain.take());
        input.image_url = image_url.or(input.image_url.take());
        input.additional_information = info.or(input.additional_information.take());
    }
}

#[derive(Debug, Subcommand)]
enum PostCommand {
    /// Создание поста (требует токен).
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        price: f64,
        #[command(flatten)]
        fields: PostFieldArgs,
    },
    /// Получение поста по id.
    Get {
        #[arg(long)]
        id: i64,
    },
    /// Обновление поста (требует токен).
    ///
    /// Не указанные поля берутся из текущей версии поста.
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[command(flatten)]
        fields: PostFieldArgs,
    },
    /// Удаление поста (требует токен).
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// Список постов.
    List {
        #[arg(long)]
        user_id: Option<String>,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
}

#[derive(Debug, Subcommand)]
enum OfferCommand {
    /// Создание оффера (требует токен).
    Create {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        car_id: String,
        #[arg(long)]
        message: Option<String>,
        /// PENDING, ACCEPT, DECLINE или CANCEL; по умолчанию PENDING.
        #[arg(long)]
        status: Option<OfferStatus>,
    },
    /// Получение оффера по id.
    Get {
        #[arg(long)]
        id: i64,
    },
    /// Замена статуса оффера (требует токен).
    Status {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        status: OfferStatus,
    },
    /// Удаление оффера (требует токен).
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// Список офферов.
    List {
        #[arg(long)]
        post_id: Option<i64>,
        #[arg(long)]
        dealer_id: Option<String>,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
}

#[derive(Debug, Subcommand)]
enum ProfileCommand {
    /// Обновление имени и телефона в user_metadata.
    Update {
        /// Домен identity-провайдера, например `tenant.auth0.com`.
        #[arg(long, env = "IDENTITY_DOMAIN")]
        identity_domain: String,
        /// Субъект пользователя (`sub`).
        #[arg(long, env = "IDENTITY_SUBJECT")]
        sub: String,
        #[arg(long)]
        user_name: String,
        #[arg(long)]
        phone_number: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_logging();

    if let Err(err) = run().await {
        eprintln!("Ошибка: {err:#}");
        process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .compact()
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let server = normalize_server(cli.server.unwrap_or_else(|| DEFAULT_HTTP_SERVER.to_string()));
    tracing::debug!(server = %server, "using marketplace server");
    let mut client = MarketplaceClient::new(server).map_err(map_client_error)?;

    if let Some(token) = load_token(Path::new(TOKEN_FILE))
        .with_context(|| format!("не удалось прочитать {TOKEN_FILE}"))?
    {
        tracing::debug!(path = TOKEN_FILE, "saved token loaded");
        client.set_token(token);
    }

    match cli.command {
        Command::Token(command) => run_token(command)?,
        Command::Post(command) => run_post(&client, command).await?,
        Command::Offer(command) => run_offer(&client, command).await?,
        Command::Profile(command) => run_profile(command).await?,
    }

    Ok(())
}

fn run_token(command: TokenCommand) -> Result<()> {
    match command {
        TokenCommand::Set { token } => {
            let Some(token) = parse_token_content(&token) else {
                bail!("токен не может быть пустым");
            };
            fs::write(TOKEN_FILE, token).context("не удалось сохранить токен")?;
            println!("Токен сохранён в {TOKEN_FILE}");
        }
        TokenCommand::Clear => {
            if Path::new(TOKEN_FILE).exists() {
                fs::remove_file(TOKEN_FILE).context("не удалось удалить токен")?;
            }
            println!("Токен удалён");
        }
    }
    Ok(())
}

async fn run_post(client: &MarketplaceClient, command: PostCommand) -> Result<()> {
    match command {
        PostCommand::Create {
            title,
            price,
            fields,
        } => {
            let mut input = PostInput {
                title,
                price,
                ..Default::default()
            };
            fields.apply_to(&mut input);

            let post = client
                .create_post(&input)
                .await
                .map_err(map_client_error)?;
            print_post("Пост создан", &post);
        }
        PostCommand::Get { id } => {
            let post = client.get_post(id).await.map_err(map_client_error)?;
            print_post("Пост", &post);
        }
        PostCommand::Update {
            id,
            title,
            price,
            fields,
        } => {
            // PUT заменяет все поля, поэтому начинаем с текущей версии поста.
            let current = client.get_post(id).await.map_err(map_client_error)?;
            let mut input = PostInput::from(&current);
            if let Some(title) = title {
                input.title = title;
            }
            if let Some(price) = price {
                input.price = price;
            }
            fields.apply_to(&mut input);

            let post = client
                .update_post(id, &input)
                .await
                .map_err(map_client_error)?;
            print_post("Пост обновлён", &post);
        }
        PostCommand::Delete { id } => {
            client.delete_post(id).await.map_err(map_client_error)?;
            println!("Пост удалён: id={id}");
        }
        PostCommand::List {
            user_id,
            limit,
            offset,
        } => {
            let list = client
                .list_posts(user_id.as_deref(), limit, offset)
                .await
                .map_err(map_client_error)?;
            print_posts(&list);
        }
    }
    Ok(())
}

async fn run_offer(client: &MarketplaceClient, command: OfferCommand) -> Result<()> {
    match command {
        OfferCommand::Create {
            post_id,
            car_id,
            message,
            status,
        } => {
            let input = OfferInput {
                post_id,
                car_id,
                additional_message: message,
                status,
            };
            let offer = client
                .create_offer(&input)
                .await
                .map_err(map_client_error)?;
            print_offer("Оффер создан", &offer);
        }
        OfferCommand::Get { id } => {
            let offer = client.get_offer(id).await.map_err(map_client_error)?;
            print_offer("Оффер", &offer);
        }
        OfferCommand::Status { id, status } => {
            let offer = client
                .update_offer_status(id, status)
                .await
                .map_err(map_client_error)?;
            print_offer("Статус обновлён", &offer);
        }
        OfferCommand::Delete { id } => {
            client.delete_offer(id).await.map_err(map_client_error)?;
            println!("Оффер удалён: id={id}");
        }
        OfferCommand::List {
            post_id,
            dealer_id,
            limit,
            offset,
        } => {
            let list = client
                .list_offers(post_id, dealer_id.as_deref(), limit, offset)
                .await
                .map_err(map_client_error)?;
            print_offers(&list);
        }
    }
    Ok(())
}

async fn run_profile(command: ProfileCommand) -> Result<()> {
    let ProfileCommand::Update {
        identity_domain,
        sub,
        user_name,
        phone_number,
    } = command;

    let session = CliIdentitySession::new(
        IdentityUser {
            sub,
            ..Default::default()
        },
        std::env::var("IDENTITY_ACCESS_TOKEN").ok(),
        PathBuf::from(IDENTITY_TOKEN_FILE),
    );
    let api = ManagementApiClient::new(&identity_domain)?;
    let mut editor =
        ProfileEditor::new(session, api, TokenRequest::management_api(&identity_domain))?;
    editor.set_user_name(user_name);
    editor.set_phone_number(phone_number);

    println!("{}", greeting_now());
    let outcome = editor.submit().await;
    for kind in editor.notifications().open() {
        println!("{}", kind.message());
    }

    if outcome != SubmitOutcome::Updated {
        bail!("профиль не обновлён");
    }
    Ok(())
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn parse_token_content(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn load_token(path: &Path) -> io::Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path)?;
    Ok(parse_token_content(&raw))
}

fn map_client_error(err: MarketplaceClientError) -> anyhow::Error {
    let message = match err {
        MarketplaceClientError::Unauthorized => {
            "требуется авторизация: выполните `marketplace-cli token set <TOKEN>`".to_string()
        }
        MarketplaceClientError::Forbidden => {
            "недостаточно прав: ресурс принадлежит другому пользователю".to_string()
        }
        MarketplaceClientError::NotFound => "ресурс не найден".to_string(),
        MarketplaceClientError::InvalidRequest(message) => {
            format!("некорректный запрос: {message}")
        }
        MarketplaceClientError::Http(err) => format!("ошибка HTTP: {err}"),
    };
    anyhow::anyhow!(message)
}

fn print_optional(label: &str, value: Option<&str>) {
    if let Some(value) = value {
        println!("{label}: {value}");
    }
}

fn print_post(title: &str, post: &Post) {
    println!("{title}");
    println!("id: {}", post.id);
    println!("user_id: {}", post.user_id);
    println!("title: {}", post.title);
    print_optional("car_make", post.car_make.as_deref());
    print_optional("car_model", post.car_model.as_deref());
    print_optional("car_year", post.car_year.as_deref());
    print_optional("zip_code", post.zip_code.as_deref());
    if let Some(radius) = post.radius {
        println!("radius: {radius}");
    }
    if let Some(mileage) = post.mileage {
        println!("mileage: {mileage}");
    }
    print_optional("trim", post.trim.as_deref());
    print_optional("color", post.color.as_deref());
    print_optional("drivetrain", post.drivetrain.as_deref());
    print_optional("image_url", post.image_url.as_deref());
    println!("price: {}", post.price);
    print_optional(
        "additional_information",
        post.additional_information.as_deref(),
    );
    println!("created_at: {}", post.created_at);
    println!("updated_at: {}", post.updated_at);
}

fn print_posts(list: &ListPostsResponse) {
    println!(
        "Постов: {} (limit={}, offset={}, total={})",
        list.posts.len(),
        list.limit,
        list.offset,
        list.total
    );

    for post in &list.posts {
        println!(
            "- [{}] {} price={} (user_id={})",
            post.id, post.title, post.price, post.user_id
        );
    }
}

fn print_offer(title: &str, offer: &Offer) {
    println!("{title}");
    println!("id: {}", offer.id);
    println!("post_id: {}", offer.post_id);
    println!("car_id: {}", offer.car_id);
    println!("dealer_id: {}", offer.dealer_id);
    print_optional("additional_message", offer.additional_message.as_deref());
    println!("status: {}", offer.status);
    println!("created_at: {}", offer.created_at);
    println!("updated_at: {}", offer.updated_at);
}

fn print_offers(list: &ListOffersResponse) {
    println!(
        "Офферов: {} (limit={}, offset={}, total={})",
        list.offers.len(),
        list.limit,
        list.offset,
        list.total
    );

    for offer in &list.offers {
        println!(
            "- [{}] post={} car={} {} (dealer_id={})",
            offer.id, offer.post_id, offer.car_id, offer.status, offer.dealer_id
        );
    }
}
