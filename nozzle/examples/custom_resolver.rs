use nozzle::{instance, Container, Error};

fn main() {
  // Every lookup goes through the resolver; the registry is never consulted.
  let container = Container::with_resolver(|_, name| match name {
    "k" => Some(instance(99)),
    _ => None,
  });

  let k = container.get_as::<i32>("k").expect("resolver knows 'k'");
  println!("k = {}", k);

  match container.get("missing") {
    Err(err @ Error::NotResolvedByCustomResolver(_)) => println!("As expected: {}", err),
    Err(other) => panic!("unexpected error: {}", other),
    Ok(_) => panic!("'missing' should not resolve"),
  }
}
