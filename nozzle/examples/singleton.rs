use nozzle::{Container, Factory};
use std::cell::Cell;
use std::rc::Rc;

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

fn main() -> nozzle::Result<()> {
  let container = Container::new();
  let next_id = Rc::new(Cell::new(0));

  // --- Singleton Registration ---
  // This factory will only be called ONCE.
  let ids = Rc::clone(&next_id);
  container
    .bind("singleton_tracker")?
    .provider(Factory::new(move |_| {
      println!("Creating SINGLETON RequestTracker...");
      let id = ids.get();
      ids.set(id + 1);
      Ok(RequestTracker { id })
    }))?
    .singleton();

  // --- Transient Registration ---
  // This factory will be called EVERY time the service is resolved.
  let ids = Rc::clone(&next_id);
  container
    .bind("transient_tracker")?
    .provider(Factory::new(move |_| {
      println!("Creating TRANSIENT RequestTracker...");
      let id = ids.get();
      ids.set(id + 1);
      Ok(RequestTracker { id })
    }))?;

  println!("--- Resolving Singletons ---");
  let s1 = container.get_as::<RequestTracker>("singleton_tracker")?;
  let s2 = container.get_as::<RequestTracker>("singleton_tracker")?;
  println!("Singleton 1 ID: {}, Singleton 2 ID: {}", s1.id, s2.id);
  assert_eq!(s1.id, 0);
  assert!(Rc::ptr_eq(&s1, &s2), "Singleton instances should be identical");
  println!("Singleton instances are the same pointer, as expected.\n");

  println!("--- Resolving Transients ---");
  let t1 = container.get_as::<RequestTracker>("transient_tracker")?;
  let t2 = container.get_as::<RequestTracker>("transient_tracker")?;
  println!("Transient 1 ID: {}, Transient 2 ID: {}", t1.id, t2.id);
  assert_eq!(t1.id, 1);
  assert_eq!(t2.id, 2);
  assert!(!Rc::ptr_eq(&t1, &t2), "Transient instances should be different");
  println!("Transient instances are different pointers, as expected.");
  Ok(())
}
