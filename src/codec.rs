// Line-oriented text codec and file persistence
//
// One task per line: `description,due_date,flag` where flag is `0` or `1`.
// Inside a field `\` is written `\\`, `,` is `\,`, LF is `\n` and CR is `\r`,
// so an encoded field never contains a raw delimiter or line break.

use crate::error::{Field, LineError, MalformedLine, Result, TodoError};
use crate::store::TaskStore;
use crate::task::{BoundedText, Task};
use fs2::FileExt;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, info, warn};

/// Field delimiter
pub const DELIMITER: char = ',';

const ESCAPE: char = '\\';

/// Default persistence file, relative to the working directory
pub const DEFAULT_FILE: &str = "todo.txt";

/// Tasks recovered from persisted text, plus the lines that were skipped
#[derive(Debug, Default)]
pub struct Decoded {
    pub tasks: Vec<Task>,
    pub skipped: Vec<MalformedLine>,
}

impl Decoded {
    fn push_line(&mut self, line_num: usize, line: &str) {
        if line.is_empty() {
            return;
        }
        match decode_line(line) {
            Ok(task) => self.tasks.push(task),
            Err(reason) => self.skip(line_num, reason),
        }
    }

    fn skip(&mut self, line_num: usize, reason: LineError) {
        warn!(line = line_num, error = %reason, "Skipping malformed task line");
        self.skipped.push(MalformedLine { line: line_num, reason });
    }
}

fn escape_into(out: &mut String, field: &str) {
    for c in field.chars() {
        match c {
            ESCAPE => out.push_str("\\\\"),
            DELIMITER => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
}

/// Encode one task as a line, without the trailing newline
pub fn encode_line(task: &Task) -> String {
    let mut line = String::with_capacity(task.description.as_str().len() + task.due_date.as_str().len() + 4);
    escape_into(&mut line, task.description.as_str());
    line.push(DELIMITER);
    escape_into(&mut line, task.due_date.as_str());
    line.push(DELIMITER);
    line.push(if task.completed { '1' } else { '0' });
    line
}

/// Encode tasks in order, one newline-terminated line each
pub fn encode(tasks: &[Task]) -> String {
    let mut out = String::new();
    for task in tasks {
        out.push_str(&encode_line(task));
        out.push('\n');
    }
    out
}

/// Split a line on unescaped delimiters, resolving escapes
fn split_fields(line: &str) -> std::result::Result<Vec<String>, LineError> {
    let mut fields = Vec::with_capacity(3);
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            ESCAPE => match chars.next() {
                Some(ESCAPE) => current.push(ESCAPE),
                Some(DELIMITER) => current.push(DELIMITER),
                Some('n') => current.push('\n'),
                Some('r') => current.push('\r'),
                Some(other) => return Err(LineError::BadEscape(other)),
                None => return Err(LineError::DanglingEscape),
            },
            DELIMITER => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);

    Ok(fields)
}

/// Decode a single line (without its line terminator)
pub fn decode_line(line: &str) -> std::result::Result<Task, LineError> {
    let fields = split_fields(line)?;
    let [description, due_date, flag]: [String; 3] = fields
        .try_into()
        .map_err(|fields: Vec<String>| LineError::FieldCount(fields.len()))?;

    let completed = match flag.as_str() {
        "0" => false,
        "1" => true,
        _ => return Err(LineError::BadFlag(flag)),
    };

    Ok(Task {
        description: BoundedText::new(Field::Description, description)?,
        due_date: BoundedText::new(Field::DueDate, due_date)?,
        completed,
    })
}

/// Decode persisted text
///
/// Empty lines are ignored. Lines that fail to decode are skipped and listed
/// in [`Decoded::skipped`]; they never abort decoding.
pub fn decode(text: &str) -> Decoded {
    let mut decoded = Decoded::default();
    for (line_num, line) in text.lines().enumerate() {
        decoded.push_line(line_num + 1, line);
    }
    decoded
}

/// Open `path` for reading, or `None` if it does not exist
fn open_existing(path: &Path) -> Result<Option<File>> {
    match File::open(path) {
        Ok(file) => Ok(Some(file)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(TodoError::io(path, e)),
    }
}

/// Temp file for `save`, carrying over the destination's permissions
///
/// A new destination gets the umask default rather than the 0600 tempfile
/// uses.
fn create_temp(dir: &Path, existing: Option<&fs::Metadata>) -> io::Result<NamedTempFile> {
    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let tmp = builder.tempfile_in(dir)?;

    if let Some(metadata) = existing.filter(|m| m.is_file()) {
        tmp.as_file().set_permissions(metadata.permissions())?;
    }
    Ok(tmp)
}

/// Replace the contents of `path` with the store's tasks
///
/// The text is written to a temporary file beside `path` and renamed over
/// it, so a failed save leaves the previous contents in place. An existing
/// destination stays exclusively locked until the rename is done.
pub fn save(store: &TaskStore, path: &Path) -> Result<()> {
    let encoded = encode(store.list());

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let existing = open_existing(path)?;
    let metadata = match &existing {
        Some(file) => {
            FileExt::lock_exclusive(file).map_err(|e| TodoError::io(path, e))?;
            Some(file.metadata().map_err(|e| TodoError::io(path, e))?)
        }
        None => None,
    };

    let mut tmp = create_temp(dir, metadata.as_ref()).map_err(|e| TodoError::io(dir, e))?;
    tmp.write_all(encoded.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| TodoError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| TodoError::io(path, e.error))?;

    // Lock is released when `existing` is dropped
    info!(file = ?path, count = store.size(), "Saved tasks");
    Ok(())
}

/// Read tasks from `path`
///
/// A missing file is a first run and yields no tasks. Malformed lines,
/// including ones that are not valid UTF-8, are skipped and reported.
pub fn load(path: &Path) -> Result<Decoded> {
    let Some(file) = open_existing(path)? else {
        debug!(file = ?path, "No task file yet, starting empty");
        return Ok(Decoded::default());
    };

    // Advisory only; some filesystems refuse locks on readable files
    if let Err(e) = FileExt::lock_shared(&file) {
        debug!(file = ?path, error = ?e, "Could not lock task file, reading unlocked");
    }

    let reader = BufReader::new(file);
    let mut decoded = Decoded::default();

    for (line_num, line) in reader.lines().enumerate() {
        match line {
            Ok(line) => decoded.push_line(line_num + 1, &line),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                decoded.skip(line_num + 1, LineError::NotUtf8);
            }
            Err(e) => return Err(TodoError::io(path, e)),
        }
    }

    info!(
        file = ?path,
        count = decoded.tasks.len(),
        skipped = decoded.skipped.len(),
        "Loaded tasks"
    );

    Ok(decoded)
}
