use std::net::SocketAddr;
use std::time::{Duration, Instant};

use configs::AppConfig;
use reqwest::StatusCode as HttpStatusCode;
use tokio::net::TcpListener;

struct TestApp {
    base_url: String,
}

async fn start_server(delete_delay_ms: u64) -> anyhow::Result<TestApp> {
    let mut cfg = AppConfig::default();
    cfg.contacts.delete_delay_ms = delete_delay_ms;
    cfg.normalize_and_validate()?;

    // built on a spawned task, as the binary does
    let app = tokio::spawn(async move { server::build_app(&cfg).await }).await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .build()
        .expect("reqwest client")
}

fn contact_rows(html: &str) -> usize {
    html.matches("class=\"contact\"").count()
}

async fn add(
    c: &reqwest::Client,
    app: &TestApp,
    name: &str,
    email: &str,
) -> anyhow::Result<(HttpStatusCode, String)> {
    let res = c
        .post(format!("{}/contacts", app.base_url))
        .form(&[("name", name), ("email", email)])
        .send()
        .await?;
    let status = res.status();
    Ok((status, res.text().await?))
}

async fn delete(
    c: &reqwest::Client,
    app: &TestApp,
    id: &str,
) -> anyhow::Result<(HttpStatusCode, String)> {
    let res = c.delete(format!("{}/contacts/{}", app.base_url, id)).send().await?;
    let status = res.status();
    Ok((status, res.text().await?))
}

#[tokio::test]
async fn e2e_contact_walkthrough() -> anyhow::Result<()> {
    let app = start_server(0).await?;
    let c = client();

    let res = c.get(format!("{}/", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.text().await?;
    assert_eq!(contact_rows(&body), 2);
    assert!(body.contains("jd@gmail.com"));
    assert!(body.contains("cd@gmail.com"));

    let (status, body) = add(&c, &app, "Bob", "bob@x.com").await?;
    assert_eq!(status, HttpStatusCode::OK);
    assert!(body.contains("id=\"contact-3\""));
    assert!(body.contains("hx-swap-oob"));

    let (status, body) = add(&c, &app, "Eve", "jd@gmail.com").await?;
    assert_eq!(status, HttpStatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("Email already exists"));
    assert!(body.contains("value=\"Eve\""));

    assert_eq!(delete(&c, &app, "1").await?, (HttpStatusCode::OK, String::new()));
    assert_eq!(
        delete(&c, &app, "99").await?,
        (HttpStatusCode::NOT_FOUND, "Contact not found".into())
    );
    assert_eq!(
        delete(&c, &app, "-1").await?,
        (HttpStatusCode::NOT_FOUND, "Contact not found".into())
    );
    assert_eq!(delete(&c, &app, "x1").await?, (HttpStatusCode::BAD_REQUEST, "Invalid id".into()));

    let body = c.get(format!("{}/", app.base_url)).send().await?.text().await?;
    assert_eq!(contact_rows(&body), 2);
    assert!(!body.contains("id=\"contact-1\""));
    let clara = body.find("id=\"contact-2\"").expect("clara still listed");
    let bob = body.find("id=\"contact-3\"").expect("bob listed");
    assert!(clara < bob);
    Ok(())
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server(0).await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_concurrent_delete_under_delay() -> anyhow::Result<()> {
    let app = start_server(300).await?;
    let c = client();

    let (a, b) = tokio::join!(delete(&c, &app, "1"), delete(&c, &app, "1"));
    let mut statuses = vec![a?.0, b?.0];
    statuses.sort();
    assert_eq!(statuses, vec![HttpStatusCode::OK, HttpStatusCode::NOT_FOUND]);

    let body = c.get(format!("{}/", app.base_url)).send().await?.text().await?;
    assert_eq!(contact_rows(&body), 1);
    assert!(body.contains("id=\"contact-2\""));
    Ok(())
}

#[tokio::test]
async fn e2e_delay_runs_before_id_parsing() -> anyhow::Result<()> {
    let app = start_server(200).await?;
    let started = Instant::now();
    let (status, _) = delete(&client(), &app, "not-a-number").await?;
    assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    assert!(started.elapsed() >= Duration::from_millis(200));
    Ok(())
}

#[tokio::test]
async fn e2e_reads_and_writes_not_blocked_by_slow_delete() -> anyhow::Result<()> {
    let app = start_server(1500).await?;
    let c = client();

    let slow = {
        let c = c.clone();
        let url = format!("{}/contacts/2", app.base_url);
        tokio::spawn(async move { c.delete(url).send().await.map(|r| r.status()) })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    let started = Instant::now();
    let res = c.get(format!("{}/", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let (status, _) = add(&c, &app, "Fast", "fast@x.com").await?;
    assert_eq!(status, HttpStatusCode::OK);
    assert!(started.elapsed() < Duration::from_millis(1000), "requests waited on the delete delay");

    assert_eq!(slow.await??, HttpStatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn e2e_concurrent_posts_same_email_admit_one() -> anyhow::Result<()> {
    let app = start_server(0).await?;
    let c = client();

    let mut handles = Vec::new();
    for i in 0..20 {
        let c = c.clone();
        let url = format!("{}/contacts", app.base_url);
        handles.push(tokio::spawn(async move {
            let name = format!("racer-{i}");
            c.post(url)
                .form(&[("name", name.as_str()), ("email", "race@x.com")])
                .send()
                .await
                .map(|r| r.status())
        }));
    }

    let mut ok = 0;
    let mut rejected = 0;
    for h in handles {
        match h.await?? {
            HttpStatusCode::OK => ok += 1,
            HttpStatusCode::UNPROCESSABLE_ENTITY => rejected += 1,
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!((ok, rejected), (1, 19));

    let body = c.get(format!("{}/", app.base_url)).send().await?.text().await?;
    assert_eq!(body.matches("race@x.com").count(), 1);
    Ok(())
}
