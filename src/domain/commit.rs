/// Subject line of a commit, as shown by `git log --pretty=%s`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSubject(String);

impl CommitSubject {
    /// Wrap a subject that is already in `%s` form, e.g. from `git2::Commit::summary`
    pub fn new(subject: impl Into<String>) -> Self {
        CommitSubject(subject.into())
    }

    /// Build a subject from a full commit message.
    ///
    /// The subject is the first paragraph with its lines joined by single
    /// spaces; leading blank lines are skipped.
    pub fn from_message(message: &str) -> Self {
        let subject = message
            .lines()
            .map(str::trim)
            .skip_while(|line| line.is_empty())
            .take_while(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        CommitSubject(subject)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this commit was produced by the nightly bump itself
    pub fn is_automated(&self, marker: &str) -> bool {
        self.0.contains(marker)
    }

    /// Whether the subject is long enough to be worth a changelog entry.
    ///
    /// Length is counted in characters, not bytes.
    pub fn is_substantial(&self, min_len: usize) -> bool {
        self.0.chars().count() > min_len
    }
}

impl From<&str> for CommitSubject {
    fn from(value: &str) -> Self {
        CommitSubject::from_message(value)
    }
}

impl From<String> for CommitSubject {
    fn from(value: String) -> Self {
        CommitSubject::from_message(&value)
    }
}

impl std::fmt::Display for CommitSubject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
