use anyhow::{Result, Context};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Output path for one direction of one corpus pair
    // @params: output_dir, output_name, direction file name
    pub fn generate_output_path<P: AsRef<Path>>(
        output_dir: P,
        output_name: &str,
        direction_file_name: &str,
    ) -> PathBuf {
        output_dir
            .as_ref()
            .join(format!("{}.{}", output_name, direction_file_name))
    }

    /// Count the lines of a text file.
    ///
    /// A final line without a trailing newline still counts as a line.
    pub fn count_lines<P: AsRef<Path>>(path: P) -> Result<usize> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open file: {:?}", path))?;

        let mut count = 0;
        for line in BufReader::new(file).lines() {
            line.with_context(|| format!("Failed to read line {} of {:?}", count + 1, path))?;
            count += 1;
        }

        Ok(count)
    }

    /// Read a text file into its lines, without line terminators
    pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open file: {:?}", path))?;

        BufReader::new(file)
            .lines()
            .collect::<std::io::Result<Vec<_>>>()
            .with_context(|| format!("Failed to read file: {:?}", path))
    }

    /// Write lines to a file, each terminated by a newline
    pub fn write_lines<P, S>(path: P, lines: &[S]) -> Result<()>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            Self::ensure_dir(parent)?;
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        let mut writer = BufWriter::new(file);
        for line in lines {
            writeln!(writer, "{}", line.as_ref())
                .with_context(|| format!("Failed to write to file: {:?}", path))?;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to write to file: {:?}", path))?;

        Ok(())
    }

    /// Concatenate text files line by line, in the given order.
    ///
    /// Every line is newline-terminated in the output, so a missing trailing
    /// newline in one input never joins two sentences. Returns the number of
    /// lines written.
    pub fn concatenate_files<P: AsRef<Path>>(input_paths: &[P], output_path: &Path) -> Result<usize> {
        let output = File::create(output_path)
            .with_context(|| format!("Failed to create file: {:?}", output_path))?;
        let mut writer = BufWriter::new(output);
        let mut written = 0;

        for input_path in input_paths {
            let input_path = input_path.as_ref();
            let input = File::open(input_path)
                .with_context(|| format!("Failed to open file: {:?}", input_path))?;

            for line in BufReader::new(input).lines() {
                let line = line.with_context(|| format!("Failed to read file: {:?}", input_path))?;
                writeln!(writer, "{}", line)
                    .with_context(|| format!("Failed to write to file: {:?}", output_path))?;
                written += 1;
            }
        }

        writer
            .flush()
            .with_context(|| format!("Failed to write to file: {:?}", output_path))?;

        Ok(written)
    }
}
