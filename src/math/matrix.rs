use rand::Rng;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;
use std::fmt;
use std::ops::Add;

/// Dense row-major matrix. Sequences are stored one timestep per row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        // (0, 1] avoids log(0).
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Xavier (Glorot) initialization: samples from N(0, sqrt(1 / rows)).
    ///
    /// Weights are laid out as (fan_in, fan_out) because inputs are row
    /// vectors multiplied from the left, so `rows` is the fan-in.
    pub fn xavier<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let std_dev = (1.0 / rows as f64).sqrt();
        let mut res = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = Matrix::sample_standard_normal(rng) * std_dev;
            }
        }
        res
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: data.first().map_or(0, |row| row.len()),
            data
        }
    }

    /// Single-row matrix.
    pub fn row_vector(values: Vec<f64>) -> Matrix {
        Matrix::from_data(vec![values])
    }

    /// Copies row `i` out as a 1×cols matrix.
    pub fn row(&self, i: usize) -> Matrix {
        Matrix::row_vector(self.data[i].clone())
    }

    pub fn set_row(&mut self, i: usize, row: &Matrix) {
        assert_eq!(row.rows, 1, "set_row expects a row vector");
        assert_eq!(row.cols, self.cols, "row width does not match matrix");
        self.data[i].copy_from_slice(&row.data[0]);
    }

    /// Flattens column `j` into a plain vector.
    pub fn column(&self, j: usize) -> Vec<f64> {
        self.data.iter().map(|row| row[j]).collect()
    }

    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn matmul(&self, rhs: &Matrix) -> Matrix {
        if self.cols != rhs.rows {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        res
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Matrix {
        assert_eq!(self.rows, rhs.rows);
        assert_eq!(self.cols, rhs.cols);
        let data = self.data.iter().zip(rhs.data.iter())
            .map(|(row_a, row_b)| {
                row_a.iter().zip(row_b.iter()).map(|(x, y)| x * y).collect()
            })
            .collect();
        Matrix::from_data(data)
    }

    /// In-place `self += rhs`, used to accumulate gradients over timesteps.
    pub fn add_assign(&mut self, rhs: &Matrix) {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }
        for (row, rhs_row) in self.data.iter_mut().zip(rhs.data.iter()) {
            for (x, y) in row.iter_mut().zip(rhs_row.iter()) {
                *x += y;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> + '_ {
        self.data.iter().flat_map(|row| row.iter())
    }

    pub fn sum(&self) -> f64 {
        self.iter().sum()
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.data.iter().enumerate() {
            let cells: Vec<String> = match f.precision() {
                Some(p) => row.iter().map(|x| format!("{x:.p$}")).collect(),
                None => row.iter().map(|x| x.to_string()).collect(),
            };
            let open = if i == 0 { "[[" } else { " [" };
            let close = if i + 1 == self.rows { "]]" } else { "]" };
            write!(f, "{open}{}{close}", cells.join(" "))?;
            if i + 1 != self.rows {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl Add for Matrix {
    type Output = Matrix;

    fn add(mut self, rhs: Self) -> Self::Output {
        self.add_assign(&rhs);
        self
    }
}
