use nozzle::{modules, Container, Factory, Result};

struct Mailer {
  host: String,
  port: u16,
}

// Each module owns one slice of the application's configuration.
fn settings(c: &Container) -> Result<()> {
  c.bind("smtp_host")?.value(String::from("mail.example.com"))?;
  c.bind("smtp_port")?.value(587u16)?;
  Ok(())
}

fn mailer(c: &Container) -> Result<()> {
  c.bind("mailer")?
    .constructor(Factory::new(|args| {
      Ok(Mailer {
        host: (*args.get::<String>(0)?).clone(),
        port: *args.get::<u16>(1)?,
      })
    }))?
    .inject(["smtp_host", "smtp_port"])?
    .singleton();
  Ok(())
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let container = Container::new();
  container.module(modules![[settings], mailer])?;

  let mailer = container.get_as::<Mailer>("mailer")?;
  println!("Mailer connects to {}:{}", mailer.host, mailer.port);
  println!("Registered bindings: {:?}", container.names());
  Ok(())
}
