use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

use crate::error::Result;

pub const SERIES_TITLE: &str = "Series_Title";
pub const RELEASED_YEAR: &str = "Released_Year";
pub const RUNTIME: &str = "Runtime";
pub const IMDB_RATING: &str = "IMDB_Rating";
pub const META_SCORE: &str = "Meta_score";
pub const GROSS: &str = "Gross";
pub const NO_OF_VOTES: &str = "No_of_Votes";
pub const DIRECTOR: &str = "Director";
pub const GENRE: &str = "Genre";
pub const CERTIFICATE: &str = "Certificate";
pub const STARS: [&str; 4] = ["Star1", "Star2", "Star3", "Star4"];
pub const DECADE: &str = "Decade";

// Series_Title,Released_Year,Certificate,Runtime,Genre,IMDB_Rating,Meta_score,
// Director,Star1,Star2,Star3,Star4,No_of_Votes,Gross
//
// Released_Year  int, a handful of rows hold a rating code instead ("PG")
// Runtime        text, "<N> min"
// Gross          text, "28,341,469"
// Genre          text, "Crime, Drama"

/// Loaded data set: the normalized frame and its typed columns.
pub struct MovieData {
    pub frame: DataFrame,
    pub movies: Movies,
}

impl MovieData {
    pub fn open(path: &Path) -> Result<Self> {
        let raw = load_path(path)?;
        tracing::info!(
            path = %path.display(),
            rows = raw.height(),
            columns = raw.width(),
            "loaded movie table"
        );
        let frame = normalize(raw)?;
        let movies = Movies::from_frame(&frame)?;
        Ok(MovieData { frame, movies })
    }
}

pub fn load_path(path: &Path) -> Result<DataFrame> {
    let bytes = std::fs::read(path)?;
    load_csv(bytes)
}

/// Cell texts read as missing in any column, matching the usual pandas defaults.
pub const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Read CSV text with every column as a string. Typing happens in [`normalize`].
pub fn load_csv(bytes: Vec<u8>) -> Result<DataFrame> {
    let null_values = NullValues::AllColumns(NA_TOKENS.iter().map(|&t| t.into()).collect());
    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_null_values(Some(null_values)))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;
    Ok(frame)
}

/// Coerce the typed columns and derive `Decade`.
///
/// Values that do not parse become null. Every column is routed through a string cast
/// first, so normalizing an already normalized frame is a no-op.
pub fn normalize(frame: DataFrame) -> Result<DataFrame> {
    let year_nulls = frame.column(RELEASED_YEAR)?.null_count();
    let runtime_nulls = frame.column(RUNTIME)?.null_count();

    let typed = frame
        .lazy()
        .with_columns([
            col(RELEASED_YEAR)
                .cast(DataType::String)
                .cast(DataType::Int32),
            col(RUNTIME)
                .cast(DataType::String)
                .str()
                .strip_suffix(lit(" min"))
                .cast(DataType::Int32),
            col(IMDB_RATING)
                .cast(DataType::String)
                .cast(DataType::Float64),
            col(META_SCORE)
                .cast(DataType::String)
                .cast(DataType::Float64),
            col(GROSS)
                .cast(DataType::String)
                .str()
                .replace_all(lit(","), lit(""), true)
                .cast(DataType::Float64),
            col(NO_OF_VOTES)
                .cast(DataType::String)
                .cast(DataType::Int64),
        ])
        .with_column(
            (col(RELEASED_YEAR).floor_div(lit(10)) * lit(10))
                .cast(DataType::Int32)
                .alias(DECADE),
        )
        .collect()?;

    let bad_years = typed.column(RELEASED_YEAR)?.null_count() - year_nulls;
    let bad_runtimes = typed.column(RUNTIME)?.null_count() - runtime_nulls;
    if bad_years > 0 {
        tracing::warn!(column = RELEASED_YEAR, rows = bad_years, "values coerced to null");
    }
    if bad_runtimes > 0 {
        tracing::warn!(column = RUNTIME, rows = bad_runtimes, "values coerced to null");
    }

    Ok(typed)
}

/// Column-oriented movie table. Nullable columns are `Option` per row; every
/// aggregation over them skips `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Movies {
    pub title: Vec<String>,
    pub released_year: Vec<Option<i32>>,
    pub runtime: Vec<Option<i32>>,
    pub imdb_rating: Vec<Option<f64>>,
    pub meta_score: Vec<Option<f64>>,
    pub gross: Vec<Option<f64>>,
    pub votes: Vec<Option<i64>>,
    pub director: Vec<Option<String>>,
    pub genre: Vec<Option<String>>,
    pub certificate: Vec<Option<String>>,
    pub stars: [Vec<Option<String>>; 4],
    pub decade: Vec<Option<i32>>,
}

impl Movies {
    /// Extract typed columns from a frame produced by [`normalize`].
    pub fn from_frame(frame: &DataFrame) -> PolarsResult<Self> {
        Ok(Movies {
            title: frame
                .column(SERIES_TITLE)?
                .str()?
                .into_iter()
                .map(|opt| opt.unwrap_or_default().to_string())
                .collect(),
            released_year: frame.column(RELEASED_YEAR)?.i32()?.into_iter().collect(),
            runtime: frame.column(RUNTIME)?.i32()?.into_iter().collect(),
            imdb_rating: floats(frame, IMDB_RATING)?,
            meta_score: floats(frame, META_SCORE)?,
            gross: floats(frame, GROSS)?,
            votes: frame.column(NO_OF_VOTES)?.i64()?.into_iter().collect(),
            director: strings(frame, DIRECTOR)?,
            genre: strings(frame, GENRE)?,
            certificate: strings(frame, CERTIFICATE)?,
            stars: [
                strings(frame, STARS[0])?,
                strings(frame, STARS[1])?,
                strings(frame, STARS[2])?,
                strings(frame, STARS[3])?,
            ],
            decade: frame.column(DECADE)?.i32()?.into_iter().collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
    }
}

/// Float column with NaN read as missing.
fn floats(frame: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    Ok(frame
        .column(name)?
        .f64()?
        .into_iter()
        .map(|opt| opt.filter(|v| !v.is_nan()))
        .collect())
}

fn strings(frame: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    Ok(frame
        .column(name)?
        .str()?
        .into_iter()
        .map(|opt| opt.map(|s| s.to_string()))
        .collect())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub(crate) const HEADER: &str = "Series_Title,Released_Year,Certificate,Runtime,Genre,IMDB_Rating,Meta_score,Director,Star1,Star2,Star3,Star4,No_of_Votes,Gross";

    /// Twelve rows shaped like the real file, including the awkward ones.
    pub(crate) const SAMPLE: &str = r#"The Shawshank Redemption,1994,A,142 min,Drama,9.3,80,Frank Darabont,Tim Robbins,Morgan Freeman,Bob Gunton,William Sadler,2343110,"28,341,469"
The Godfather,1972,A,175 min,"Crime, Drama",9.2,100,Francis Ford Coppola,Marlon Brando,Al Pacino,James Caan,Diane Keaton,1620367,"134,966,411"
The Dark Knight,2008,UA,152 min,"Action, Crime, Drama",9.0,84,Christopher Nolan,Christian Bale,Heath Ledger,Aaron Eckhart,Michael Caine,2303232,"534,858,444"
Inception,2010,UA,148 min,"Action, Adventure, Sci-Fi",8.8,74,Christopher Nolan,Leonardo DiCaprio,Joseph Gordon-Levitt,Elliot Page,Ken Watanabe,2067042,"292,576,195"
Fight Club,1999,A,139 min,Drama,8.8,66,David Fincher,Brad Pitt,Edward Norton,Meat Loaf,Zach Grenier,1854740,"37,030,102"
Interstellar,2014,UA,169 min,"Adventure, Drama, Sci-Fi",8.6,74,Christopher Nolan,Matthew McConaughey,Anne Hathaway,Jessica Chastain,Mackenzie Foy,1512360,"188,020,017"
Memento,2000,UA,113 min,"Mystery, Thriller",8.4,80,Christopher Nolan,Guy Pearce,Carrie-Anne Moss,Joe Pantoliano,Mark Boone Junior,1125712,"25,544,867"
Apollo 13,PG,U,140 min,"Adventure, Drama, History",7.6,77,Ron Howard,Tom Hanks,Bill Paxton,Kevin Bacon,Gary Sinise,269197,"173,837,933"
Se7en,1995,A,127 min,"Crime, Drama, Mystery",8.6,65,David Fincher,Morgan Freeman,Brad Pitt,Kevin Spacey,Andrew Kevin Walker,1445096,"100,125,643"
The Kid,1921,Passed,68 min,"Comedy, Drama, Family",8.3,,Charles Chaplin,Charles Chaplin,Edna Purviance,Jackie Coogan,Carl Miller,113314,"5,450,000"
Sherlock Jr.,1924,Passed,45 min,"Action, Comedy, Romance",8.2,,Buster Keaton,Buster Keaton,Kathryn McGuire,Joe Keaton,Erwin Connelly,41985,"977,375"
Zodiac,2007,,unknown,"Crime, Drama, Mystery",7.7,78,David Fincher,Jake Gyllenhaal,Robert Downey Jr.,Mark Ruffalo,Anthony Edwards,465234,
"#;

    pub(crate) fn csv(rows: &str) -> Vec<u8> {
        format!("{HEADER}\n{rows}").into_bytes()
    }

    pub(crate) fn movies_from(rows: &str) -> crate::error::Result<Movies> {
        let frame = normalize(load_csv(csv(rows))?)?;
        Ok(Movies::from_frame(&frame)?)
    }

    pub(crate) fn sample() -> crate::error::Result<Movies> {
        movies_from(SAMPLE)
    }
}
