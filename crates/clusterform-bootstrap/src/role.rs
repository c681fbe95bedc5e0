use std::fmt;

/// Which side of the cluster an instance boots as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
  /// The single node hosting the cluster-management server.
  Coordinator,
  /// A member of the elastically sized worker pool.
  Worker,
}

impl Role {
  pub fn as_str(&self) -> &'static str {
    match self {
      Role::Coordinator => "coordinator",
      Role::Worker => "worker",
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
