/*!

This is the long-form manual for `election_tally` and `vizzard`.

## Input formats

Three files are read. The first two are required, the run stops if one of them is missing.

### State information (`State-Info.csv`)

Comma-separated values. The first two lines are headers and are always ignored, even when
they are blank. Bytes that are not valid UTF-8 are replaced, the line is still read.
Every following line with at least 15 fields describes a state:
* field 2 (index 1): the state identifier, for example `CA`
* field 15 (index 14): the number of electoral votes. Any text that is not a digit or a dot is
  removed, so `54 votes` is read as `54`. Decimal values are truncated.

Lines whose electoral votes cannot be read are skipped with a warning.

### Vote results (`Vote-Results.xlsx`)

An Excel workbook. The worksheet named `Results` is used, or the first worksheet if there is
no such name. The first two rows are headers. The columns are positional:
* column B (index 1): the state identifier
* column D (index 3): the votes for candidate B
* column E (index 4): the votes for candidate A

A vote count that cannot be read counts as 0. A row with one of these cells empty is skipped.

### Counties (`Voting-Counties.csv`)

Comma-separated values with one header line, which must be the first line of the file. The columns are found by name, ignoring case:

| content              | accepted names            |
|----------------------|---------------------------|
| latitude             | `lat`, `latitude`         |
| longitude            | `lng`, `longitude`        |
| state identifier     | `state_id`, `state`       |
| votes of candidate A | `a_votes`, `bb votes`     |
| votes of candidate B | `b_votes`, `rr votes`     |

A county is won by candidate A only with strictly more votes. Ties are shown as won by B.
This file only feeds the map: when it is missing or malformed, the map is simply empty.

## Results

* Electoral votes are awarded winner-take-all per state. A tied state awards nothing.
* The partial report assumes that states report in alphabetical order, evenly over 24 hours:
  at hour `h`, the first `floor(h / 24 * n)` states out of `n` have reported.

## Configuration

`vizzard` runs with sensible defaults: it looks for the files above in a `data` directory.
A configuration file in JSON can change the locations:

```text
{
  "dataDirectory": "data",
  "stateInfoFile": "State-Info.csv",
  "voteResultsFile": "Vote-Results.xlsx",
  "resultsWorksheet": "Results",
  "countiesFile": "Voting-Counties.csv",
  "mapImage": "us_map.png",
  "outputDirectory": "out",
  "candidates": { "a": "Alice", "b": "Bob" }
}
```

All the keys are optional. Relative paths are resolved from the directory of the configuration file.
The command line options take precedence over the configuration file.

 */
